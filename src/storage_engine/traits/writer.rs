use crate::storage_engine::WriteBatch;
use std::io::Result;

pub trait KvWriter {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Equivalent to writing a batch holding a single put.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut batch = WriteBatch::with_capacity(1);
        batch.put(key, value);
        self.write(batch)
    }

    /// Commits every op in `batch` as **one atomic unit**.
    ///
    /// Either all ops become visible or none do, both to concurrent readers
    /// and after a crash. Writes are serialized by the engine. An empty batch
    /// is a no-op.
    ///
    /// # Returns:
    /// - `Ok(())`: Once the batch is applied.
    /// - `Err(std::io::Error)`: If the batch could not be persisted; no op is
    ///   visible in that case.
    fn write(&self, batch: WriteBatch) -> Result<()>;
}
