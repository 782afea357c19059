use crate::storage_engine::checksum::{compute_checksum, verify_checksum};
use crate::storage_engine::constants::*;
use crate::storage_engine::key_index::{KeyIndex, ValueLocation};
use crate::storage_engine::record_codec::{DecodedOp, decode_ops, encode_ops};
use crate::storage_engine::traits::{KvReader, KvWriter};
use crate::storage_engine::{
    BatchOp, CursorSource, KeyRange, RangeCursor, RecordMetadata, ValueHandle, WriteBatch,
};
use crate::utils::{append_extension, verify_file_existence};
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{Error, ErrorKind, Result, Seek, SeekFrom, Write};
use std::ops::{Bound, Range};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Append-only, memory-mapped, ordered key-value engine.
///
/// Every committed batch is one record appended to a single file. An
/// in-memory [`KeyIndex`] keeps live keys in byte order so range cursors can
/// walk them in either direction; values are read zero-copy out of the
/// current mapping.
pub struct DataStore {
    file: Arc<RwLock<File>>,
    mmap: Arc<Mutex<Arc<Mmap>>>,
    tail_offset: AtomicU64,
    key_index: Arc<RwLock<KeyIndex>>,
    path: PathBuf,
}

impl DataStore {
    /// Opens an **existing** or **new** storage file.
    ///
    /// This function:
    /// 1. **Opens the file** in read/write mode (creating it if necessary).
    /// 2. **Maps the file** into memory.
    /// 3. **Recovers the valid record chain**, truncating any torn tail.
    /// 4. **Replays every record** into the ordered key index.
    ///
    /// # Returns:
    /// - `Ok(DataStore)`: A **new storage instance**.
    /// - `Err(std::io::Error)`: If any file operation fails, or a record that
    ///   passed its checksum cannot be decoded.
    pub fn open(path: &Path) -> Result<Self> {
        let file = Self::open_file_in_append_mode(path)?;
        let file_len = file.metadata()?.len();

        let mmap = Self::init_mmap(&file)?;

        let final_len = Self::recover_valid_chain(&mmap, file_len);

        if final_len < file_len {
            warn!(
                "Truncating corrupted data in {} from offset {} to {}.",
                path.display(),
                final_len,
                file_len
            );

            drop(mmap);
            drop(file);

            let file = OpenOptions::new().read(true).write(true).open(path)?;
            file.set_len(final_len)?;
            file.sync_all()?;

            return Self::open(path);
        }

        let key_index = Self::build_index(&mmap, final_len)?;

        info!(
            "Opened {} ({} bytes, {} live keys).",
            path.display(),
            final_len,
            key_index.len()
        );

        Ok(Self {
            file: Arc::new(RwLock::new(file)),
            mmap: Arc::new(Mutex::new(Arc::new(mmap))),
            tail_offset: final_len.into(),
            key_index: Arc::new(RwLock::new(key_index)),
            path: path.to_path_buf(),
        })
    }

    /// Opens a storage file that must already exist.
    ///
    /// # Returns:
    /// - `Err(std::io::Error)` with `ErrorKind::NotFound` if the file is missing.
    pub fn open_existing(path: &Path) -> Result<Self> {
        verify_file_existence(path)?;
        Self::open(path)
    }

    /// Returns the storage file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the storage file positioned at its end.
    ///
    /// Opening with `append` can fail on Windows, so the file is opened
    /// normally and the cursor moved to the end instead.
    fn open_file_in_append_mode(path: &Path) -> Result<File> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        file.seek(SeekFrom::End(0))?;

        Ok(file)
    }

    /// Maps `file` read-only.
    ///
    /// # Safety:
    /// - The mapping is only valid while the file is not truncated underneath
    ///   it. The store only truncates before any mapping is shared, or to roll
    ///   back bytes no index entry points at.
    fn init_mmap(file: &File) -> Result<Mmap> {
        unsafe { memmap2::MmapOptions::new().map(file) }
    }

    /// Finds the largest offset at which a complete, checksummed record chain
    /// ends.
    ///
    /// Scans backwards from the file end one byte at a time; the first offset
    /// whose chain of `prev_offset` back-links reaches offset `0` with every
    /// checksum intact wins. Returns `0` when no valid chain exists.
    fn recover_valid_chain(mmap: &Mmap, file_len: u64) -> u64 {
        let mut cursor = file_len.min(mmap.len() as u64);

        while cursor >= METADATA_SIZE as u64 {
            if Self::record_chain(mmap, cursor).is_some() {
                if cursor < file_len {
                    debug!("Found valid chain ending at offset {}.", cursor);
                }
                return cursor;
            }
            cursor -= 1;
        }

        0
    }

    /// Walks the chain ending at `end` back to offset `0`.
    ///
    /// Returns `(payload_range, metadata)` per record, newest first, or `None`
    /// if any link or checksum is broken.
    fn record_chain(mmap: &Mmap, end: u64) -> Option<Vec<(Range<usize>, RecordMetadata)>> {
        let mut records = Vec::new();
        let mut end = end as usize;

        while end > 0 {
            let metadata_offset = end.checked_sub(METADATA_SIZE)?;
            let metadata = RecordMetadata::deserialize(&mmap[metadata_offset..end])?;

            let record_start = usize::try_from(metadata.prev_offset).ok()?;
            if record_start >= metadata_offset {
                return None;
            }

            let payload = &mmap[record_start..metadata_offset];
            if !verify_checksum(payload, &metadata) {
                return None;
            }

            records.push((record_start..metadata_offset, metadata));
            end = record_start;
        }

        Some(records)
    }

    /// Replays every record up to `tail_offset`, oldest first, into a fresh
    /// index.
    fn build_index(mmap: &Mmap, tail_offset: u64) -> Result<KeyIndex> {
        let mut index = KeyIndex::new();

        let Some(chain) = Self::record_chain(mmap, tail_offset) else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "record chain broken after recovery",
            ));
        };

        for (payload_range, metadata) in chain.into_iter().rev() {
            let record_start = payload_range.start as u64;
            let payload = &mmap[payload_range];

            for op in decode_ops(payload, metadata.op_count)? {
                match op {
                    DecodedOp::Put { key, value } => {
                        index.insert(key.to_vec(), Self::locate(record_start, &value)?);
                    }
                    DecodedOp::Delete { key } => {
                        index.remove(key);
                    }
                }
            }
        }

        Ok(index)
    }

    fn locate(record_start: u64, value: &Range<usize>) -> Result<ValueLocation> {
        let len = u32::try_from(value.len())
            .map_err(|_| Error::new(ErrorKind::InvalidData, "value length exceeds u32"))?;
        Ok(ValueLocation {
            offset: record_start + value.start as u64,
            len,
        })
    }

    fn current_mmap(&self) -> Result<Arc<Mmap>> {
        let guard = self
            .mmap
            .lock()
            .map_err(|_| Error::other("Failed to acquire mmap lock"))?;
        Ok(Arc::clone(&guard))
    }

    fn handle_for(&self, location: ValueLocation) -> Result<ValueHandle> {
        let mmap_arc = self.current_mmap()?;
        let range = location.range();

        if range.end > mmap_arc.len() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "value at {}..{} lies beyond the mapped file ({} bytes)",
                    range.start,
                    range.end,
                    mmap_arc.len()
                ),
            ));
        }

        Ok(ValueHandle { mmap_arc, range })
    }

    /// Retrieves a zero-copy handle to the value stored under `key`.
    ///
    /// # Returns:
    /// - `Ok(Some(ValueHandle))`: Handle to the live value.
    /// - `Ok(None)`: If the key is absent or deleted.
    /// - `Err(std::io::Error)`: On lock poisoning or a dangling index entry.
    pub fn read(&self, key: &[u8]) -> Result<Option<ValueHandle>> {
        let location = {
            let index = self
                .key_index
                .read()
                .map_err(|_| Error::other("Failed to acquire index lock"))?;
            index.get(key)
        };

        location.map(|location| self.handle_for(location)).transpose()
    }

    /// Re-maps the file and applies the committed batch to the index.
    ///
    /// The new mapping is published **before** the index is updated, so any
    /// reader that observes a new index entry also observes a mapping that
    /// covers it.
    ///
    /// # Locks Acquired:
    /// - `mmap` (`Mutex<Arc<Mmap>>`), then `key_index` (`RwLock<KeyIndex>`).
    fn reindex(
        &self,
        write_guard: &RwLockWriteGuard<'_, File>,
        record_start: u64,
        new_tail: u64,
        batch: WriteBatch,
        value_ranges: Vec<Option<Range<usize>>>,
    ) -> Result<()> {
        let mut updates = Vec::with_capacity(batch.len());
        for (op, value_range) in batch.into_iter().zip(value_ranges) {
            match (op, value_range) {
                (BatchOp::Put { key, .. }, Some(value_range)) => {
                    updates.push((key, Some(Self::locate(record_start, &value_range)?)));
                }
                (BatchOp::Delete { key }, _) => updates.push((key, None)),
                (BatchOp::Put { .. }, None) => {
                    return Err(Error::other("put op encoded without a value range"));
                }
            }
        }

        let new_mmap = Self::init_mmap(write_guard)?;

        // Both locks are taken before anything is published.
        let mut mmap_guard = self
            .mmap
            .lock()
            .map_err(|_| Error::other("Failed to acquire mmap lock"))?;
        let mut index_guard = self
            .key_index
            .write()
            .map_err(|_| Error::other("Failed to acquire index lock"))?;

        *mmap_guard = Arc::new(new_mmap);
        for (key, location) in updates {
            match location {
                Some(location) => {
                    index_guard.insert(key, location);
                }
                None => {
                    index_guard.remove(&key);
                }
            }
        }

        self.tail_offset.store(new_tail, Ordering::Release);

        Ok(())
    }

    /// Discards an appended but unpublished record so the chain stays intact.
    fn rollback_partial_write(file: &mut File, record_start: u64) -> Result<()> {
        file.set_len(record_start)?;
        file.seek(SeekFrom::End(0))?;
        Ok(())
    }

    /// Rewrites the file so it only holds live keys.
    ///
    /// Live pairs are copied in key order into `<path>.bk`, in records of at
    /// most [`COMPACTION_RECORD_OPS`] ops, which then replaces the original.
    /// Requires exclusive access; no cursor or handle can outlive the swap.
    pub fn compact(&mut self) -> Result<()> {
        let compacted_path = append_extension(&self.path, "bk");
        debug!("Starting compaction. Writing to: {:?}", compacted_path);

        if compacted_path.exists() {
            std::fs::remove_file(&compacted_path)?;
        }

        {
            let compacted_storage = DataStore::open(&compacted_path)?;
            let mmap_arc = self.current_mmap()?;
            let index = self
                .key_index
                .read()
                .map_err(|_| Error::other("Failed to acquire index lock"))?;

            let mut batch = WriteBatch::with_capacity(COMPACTION_RECORD_OPS.min(index.len()));
            for (key, location) in index.iter() {
                let value = mmap_arc.get(location.range()).ok_or_else(|| {
                    Error::new(ErrorKind::InvalidData, "live value beyond mapped file")
                })?;
                batch.put(key, value);

                if batch.len() >= COMPACTION_RECORD_OPS {
                    compacted_storage.write(std::mem::take(&mut batch))?;
                }
            }
            compacted_storage.write(batch)?;

            compacted_storage
                .file
                .read()
                .map_err(|_| Error::other("Failed to acquire file lock"))?
                .sync_all()?;
        }

        debug!("Compacted copy written. Swapping files...");
        std::fs::rename(&compacted_path, &self.path)?;

        *self = DataStore::open(&self.path)?;
        info!("Compaction of {} successful.", self.path.display());
        Ok(())
    }

    /// Number of live keys.
    pub fn live_count(&self) -> Result<usize> {
        let index = self
            .key_index
            .read()
            .map_err(|_| Error::other("Failed to acquire index lock"))?;
        Ok(index.len())
    }

    /// Current size of the storage file on disk.
    pub fn storage_size(&self) -> Result<u64> {
        std::fs::metadata(&self.path).map(|meta| meta.len())
    }

    /// Estimates how many bytes [`Self::compact`] would reclaim.
    ///
    /// The compacted size is computed exactly from the live index: every live
    /// pair as a put op, plus one metadata trailer per compaction record.
    pub fn estimate_compaction_savings(&self) -> Result<u64> {
        let total_size = self.tail_offset.load(Ordering::Acquire);

        let index = self
            .key_index
            .read()
            .map_err(|_| Error::other("Failed to acquire index lock"))?;

        let ops_bytes: u64 = index
            .iter()
            .map(|(key, _)| (1 + 2 * LEN_PREFIX_SIZE + key.len()) as u64)
            .sum::<u64>()
            + index.live_value_bytes();
        let records = index.len().div_ceil(COMPACTION_RECORD_OPS) as u64;

        Ok(total_size.saturating_sub(ops_bytes + records * METADATA_SIZE as u64))
    }
}

impl KvWriter for DataStore {
    /// Appends `batch` as a single record.
    ///
    /// The record (payload plus trailer) is written with one `write_all` under
    /// the file lock. If that or the remap fails, the appended bytes are
    /// truncated away before the error is returned, so later records still
    /// chain correctly.
    fn write(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let op_count = u32::try_from(batch.len()).map_err(|_| {
            Error::new(ErrorKind::InvalidInput, "batch holds more than u32::MAX ops")
        })?;
        let (mut record, value_ranges) = encode_ops(&batch)?;
        let payload_len = record.len();

        let mut file = self
            .file
            .write()
            .map_err(|_| Error::other("Failed to acquire file lock"))?;

        let record_start = self.tail_offset.load(Ordering::Acquire);
        let metadata = RecordMetadata::new(
            op_count,
            record_start,
            compute_checksum(&record, op_count, record_start),
        );
        record.extend_from_slice(&metadata.serialize());

        let new_tail = record_start + record.len() as u64;
        let committed = file
            .write_all(&record)
            .and_then(|_| file.flush())
            .and_then(|_| self.reindex(&file, record_start, new_tail, batch, value_ranges));

        if let Err(err) = committed {
            if let Err(rollback_err) = Self::rollback_partial_write(&mut file, record_start) {
                warn!(
                    "Failed to roll back record at offset {}: {}",
                    record_start, rollback_err
                );
            }
            return Err(err);
        }

        debug!(
            "Appended record of {} ops ({} payload bytes) at offset {}.",
            op_count, payload_len, record_start
        );

        Ok(())
    }
}

impl KvReader for DataStore {
    type Cursor<'a> = RangeCursor<'a, DataStore>;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key)?.map(|handle| handle.to_vec()))
    }

    fn cursor(&self, range: KeyRange) -> Result<Self::Cursor<'_>> {
        Ok(RangeCursor::new(self, range))
    }
}

impl CursorSource for DataStore {
    type Value = ValueHandle;

    fn locate_first(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, ValueHandle)>> {
        let found = {
            let index = self
                .key_index
                .read()
                .map_err(|_| Error::other("Failed to acquire index lock"))?;
            index
                .first_in(lower, upper)
                .map(|(key, location)| (key.to_vec(), location))
        };

        found
            .map(|(key, location)| Ok((key, self.handle_for(location)?)))
            .transpose()
    }

    fn locate_last(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, ValueHandle)>> {
        let found = {
            let index = self
                .key_index
                .read()
                .map_err(|_| Error::other("Failed to acquire index lock"))?;
            index
                .last_in(lower, upper)
                .map(|(key, location)| (key.to_vec(), location))
        };

        found
            .map(|(key, location)| Ok((key, self.handle_for(location)?)))
            .transpose()
    }
}
