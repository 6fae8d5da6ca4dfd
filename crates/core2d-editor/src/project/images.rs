//! Content-addressed image cache of an open project.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

/// Images referenced by image shapes, keyed by a UUID v5 of their bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCache {
    images: BTreeMap<String, Vec<u8>>,
}

impl ImageCache {
    /// Key the cache would assign to `bytes`.
    pub fn key_for(name: &str, bytes: &[u8]) -> String {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, bytes);
        let extension = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
            .to_ascii_lowercase();
        format!("{}.{}", id, extension)
    }

    /// Add an image, returning its key. Identical content yields the same key.
    pub fn add_image(&mut self, name: &str, bytes: Vec<u8>) -> String {
        let key = Self::key_for(name, &bytes);
        self.images.entry(key.clone()).or_insert(bytes);
        key
    }

    /// Insert under an existing key, as read back from a project archive.
    pub fn insert(&mut self, key: String, bytes: Vec<u8>) {
        self.images.insert(key, bytes);
    }

    pub fn get_image(&self, key: &str) -> Option<&[u8]> {
        self.images.get(key).map(Vec::as_slice)
    }

    pub fn remove_image(&mut self, key: &str) -> Option<Vec<u8>> {
        self.images.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop every image whose key is not in `used`; returns the removed count.
    pub fn purge_unused_images(&mut self, used: &HashSet<String>) -> usize {
        let before = self.images.len();
        self.images.retain(|key, _| used.contains(key));
        before - self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_addressed_keys() {
        let mut cache = ImageCache::default();
        let k1 = cache.add_image("a.PNG", vec![1, 2, 3]);
        let k2 = cache.add_image("copy.png", vec![1, 2, 3]);
        let k3 = cache.add_image("b.png", vec![4]);
        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert!(k1.ends_with(".png"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_purge_unused() {
        let mut cache = ImageCache::default();
        let keep = cache.add_image("a.png", vec![1]);
        cache.add_image("b.png", vec![2]);
        let used: HashSet<String> = [keep.clone()].into_iter().collect();
        assert_eq!(cache.purge_unused_images(&used), 1);
        assert_eq!(cache.get_image(&keep), Some(&[1u8][..]));
    }
}
