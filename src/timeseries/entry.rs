use crate::error::Result;
use crate::timeseries::key_codec::{decode_key, encode_key};

/// One `(namespace, timestamp, value)` record.
///
/// Entries own their bytes; nothing borrows from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub namespace: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(namespace: impl Into<String>, timestamp: i64, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace: namespace.into(),
            timestamp,
            value: value.into(),
        }
    }

    /// Rebuilds an entry from a raw engine key and value.
    pub fn from_raw(key: &[u8], value: &[u8]) -> Result<Self> {
        let (namespace, timestamp) = decode_key(key)?;
        Ok(Self {
            namespace,
            timestamp,
            value: value.to_vec(),
        })
    }

    /// The engine key this entry is stored under.
    pub fn key(&self) -> Vec<u8> {
        encode_key(&self.namespace, self.timestamp)
    }
}
