//! JSON serialization of object graphs.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serializer used for projects, clipboard fragments and library items.
///
/// Shared references are expressed as ids in the serialized graph, so a
/// round trip keeps sharing intact without any serializer-side bookkeeping.
pub trait JsonSerializer {
    /// Serialize a value to JSON text.
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Deserialize a value from JSON text.
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T>;
}

/// [`JsonSerializer`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonSerializer {
    /// Emit indented output.
    pub pretty: bool,
}

impl SerdeJsonSerializer {
    /// Serializer producing indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl JsonSerializer for SerdeJsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        values: Vec<f64>,
    }

    #[test]
    fn test_round_trip() {
        let serializer = SerdeJsonSerializer::pretty();
        let sample = Sample {
            name: "grid".to_string(),
            values: vec![1.5, -2.0],
        };
        let text = serializer.serialize(&sample).unwrap();
        assert!(text.contains('\n'));
        let back: Sample = serializer.deserialize(&text).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let serializer = SerdeJsonSerializer::default();
        let result: Result<Sample> = serializer.deserialize("{not json");
        assert!(result.unwrap_err().is_io_error());
    }
}
