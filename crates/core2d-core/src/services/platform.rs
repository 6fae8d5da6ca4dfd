//! Asynchronous platform services.
//!
//! Each call is a single in-flight awaitable. A user dismissing the platform
//! dialog yields `Ok(None)`, never an error.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;

/// System clipboard text access.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Current clipboard text, if any.
    async fn get_text(&self) -> Result<Option<String>>;

    /// Replace the clipboard text.
    async fn set_text(&self, text: &str) -> Result<()>;
}

/// Script execution engine.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Execute `code`.
    async fn execute(&self, code: &str) -> Result<()>;
}

/// Image chosen through a platform file picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    /// File name the image was picked from.
    pub name: String,
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Platform image file picker.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Ask the user for an image; `None` when the dialog is dismissed.
    async fn pick_image(&self) -> Result<Option<PickedImage>>;
}

/// In-process clipboard for headless sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn get_text(&self) -> Result<Option<String>> {
        Ok(self.text.lock().clone())
    }

    async fn set_text(&self, text: &str) -> Result<()> {
        *self.text.lock() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.get_text().await.unwrap(), None);
        clipboard.set_text("{\"kind\":\"fragment\"}").await.unwrap();
        assert_eq!(
            clipboard.get_text().await.unwrap().as_deref(),
            Some("{\"kind\":\"fragment\"}")
        );
    }
}
