use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Byte-level codec for model objects crossing a build boundary. The wire
/// encoding is opaque to callers; all they rely on is that ordered sequences
/// of entries round-trip intact.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadSerializer;

impl PayloadSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    pub fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
