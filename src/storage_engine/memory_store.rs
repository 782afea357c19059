use crate::storage_engine::key_index::is_valid_span;
use crate::storage_engine::traits::{KvReader, KvWriter};
use crate::storage_engine::{BatchOp, CursorSource, KeyRange, RangeCursor, WriteBatch};
use std::collections::BTreeMap;
use std::io::{Error, Result};
use std::ops::Bound;
use std::sync::RwLock;

/// Volatile ordered engine backed by a `BTreeMap`.
///
/// Batches are applied under a single write lock, so readers observe either
/// all of a batch or none of it. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_guard()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read_guard()?.is_empty())
    }

    fn read_guard(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|_| Error::other("Failed to acquire memory store lock"))
    }
}

impl KvWriter for MemoryStore {
    fn write(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::other("Failed to acquire memory store lock"))?;

        for op in batch {
            match op {
                BatchOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }

        Ok(())
    }
}

impl KvReader for MemoryStore {
    type Cursor<'a> = RangeCursor<'a, MemoryStore>;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.read_guard()?.get(key).cloned())
    }

    fn cursor(&self, range: KeyRange) -> Result<Self::Cursor<'_>> {
        Ok(RangeCursor::new(self, range))
    }
}

impl CursorSource for MemoryStore {
    type Value = Vec<u8>;

    fn locate_first(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        if !is_valid_span(lower, upper) {
            return Ok(None);
        }
        Ok(self
            .read_guard()?
            .range::<[u8], _>((lower, upper))
            .next()
            .map(|(key, value)| (key.clone(), value.clone())))
    }

    fn locate_last(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        if !is_valid_span(lower, upper) {
            return Ok(None);
        }
        Ok(self
            .read_guard()?
            .range::<[u8], _>((lower, upper))
            .next_back()
            .map(|(key, value)| (key.clone(), value.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::traits::KvCursor;

    #[test]
    fn test_batch_applies_in_order() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .put(b"a".to_vec(), b"1".to_vec())
            .put(b"a".to_vec(), b"2".to_vec())
            .put(b"b".to_vec(), b"3".to_vec())
            .delete(b"b".to_vec());
        store.write(batch).unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_cursor_walks_both_directions() {
        let store = MemoryStore::new();
        for key in [b"p|1", b"p|2", b"p|3", b"q|1"] {
            store.put(key, b"v").unwrap();
        }

        let mut cursor = store.cursor(KeyRange::prefix(b"p|")).unwrap();
        assert!(!cursor.is_valid());

        let mut forward = Vec::new();
        let mut ok = cursor.first().unwrap();
        while ok {
            forward.push(cursor.key().unwrap().to_vec());
            ok = cursor.next().unwrap();
        }
        assert_eq!(forward, vec![b"p|1".to_vec(), b"p|2".to_vec(), b"p|3".to_vec()]);
        assert!(!cursor.is_valid());

        assert!(cursor.last().unwrap());
        assert_eq!(cursor.key(), Some(b"p|3".as_slice()));
        assert!(cursor.prev().unwrap());
        assert_eq!(cursor.key(), Some(b"p|2".as_slice()));

        assert!(cursor.seek(b"p|25").unwrap());
        assert_eq!(cursor.key(), Some(b"p|3".as_slice()));
        assert!(!cursor.seek(b"q").unwrap());
    }
}
