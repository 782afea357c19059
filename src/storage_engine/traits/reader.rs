use crate::storage_engine::KeyRange;
use crate::storage_engine::traits::KvCursor;
use std::io::Result;

pub trait KvReader {
    /// Cursor type returned by [`Self::cursor`]; borrows the engine for its lifetime.
    type Cursor<'a>: KvCursor
    where
        Self: 'a;

    /// Retrieves the current value stored under `key`.
    ///
    /// # Returns:
    /// - `Ok(Some(value))`: An owned copy of the value.
    /// - `Ok(None)`: If the key is absent or was deleted.
    /// - `Err(std::io::Error)`: On I/O failure.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Opens a bidirectional cursor restricted to `range`.
    ///
    /// The cursor starts unpositioned; call `first`, `last` or `seek` before
    /// reading `key`/`value`. Dropping the cursor releases it.
    fn cursor(&self, range: KeyRange) -> Result<Self::Cursor<'_>>;

    /// Returns `true` if `key` currently holds a value.
    fn contains_key(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
