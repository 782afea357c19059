use crate::error::{Error, Result};
use crate::storage_engine::traits::{KvCursor, KvReader};
use crate::storage_engine::{KeyRange, WriteBatch};
use crate::timeseries::constants::{KEY_SEPARATOR, REGISTRY_MARKER, REGISTRY_PREFIX};

/// Records which namespaces have ever received an entry.
///
/// Each namespace owns one marker key `REGISTRY_PREFIX ++ b'|' ++ namespace`
/// holding [`REGISTRY_MARKER`]. Markers are never removed, and writing one
/// twice leaves the same key and value behind.
pub struct NamespaceRegistry;

impl NamespaceRegistry {
    /// Key of the marker for `namespace`.
    pub fn marker_key(namespace: &str) -> Vec<u8> {
        let mut key = Self::keyspace_prefix();
        key.extend_from_slice(namespace.as_bytes());
        key
    }

    /// Stages the marker for `namespace` into `batch`.
    ///
    /// The caller commits it together with the entry it protects, so no entry
    /// is ever visible without its marker.
    pub fn mark(batch: &mut WriteBatch, namespace: &str) {
        batch.put(Self::marker_key(namespace), REGISTRY_MARKER);
    }

    /// Lists every registered namespace in ascending byte order.
    ///
    /// This walks the whole registry keyspace, so the cost grows with the
    /// number of namespaces ever written.
    ///
    /// # Returns:
    /// - `Ok(Vec<String>)`: Possibly empty, never partial.
    /// - `Err(Error::Engine)`: If the scan fails part way.
    /// - `Err(Error::MalformedKey)`: If a marker does not hold a UTF-8 name.
    pub fn list<E: KvReader>(engine: &E) -> Result<Vec<String>> {
        let prefix = Self::keyspace_prefix();
        let mut cursor = engine.cursor(KeyRange::prefix(&prefix))?;

        let mut namespaces = Vec::new();
        let mut positioned = cursor.first()?;
        while positioned {
            if let Some(key) = cursor.key() {
                let name = String::from_utf8(key[prefix.len()..].to_vec())
                    .map_err(|_| Error::malformed_key(key, "registered namespace is not UTF-8"))?;
                namespaces.push(name);
            }
            positioned = cursor.next()?;
        }

        Ok(namespaces)
    }

    /// Returns `true` if `namespace` has a marker.
    pub fn is_registered<E: KvReader>(engine: &E, namespace: &str) -> Result<bool> {
        Ok(engine.contains_key(&Self::marker_key(namespace))?)
    }

    fn keyspace_prefix() -> Vec<u8> {
        let mut prefix = Vec::with_capacity(REGISTRY_PREFIX.len() + 1);
        prefix.extend_from_slice(REGISTRY_PREFIX);
        prefix.push(KEY_SEPARATOR);
        prefix
    }
}
