use crate::storage_engine::constants::*;

/// Metadata trailer for one append-only record.
///
/// Every call to `write(batch)` appends exactly one record. A record is a
/// **variable-sized payload** (the encoded ops of the batch) followed by a
/// **fixed-size metadata block**. Keeping the metadata at the end lets the
/// file be walked backwards from its tail during recovery.
///
/// ## Record Layout
///
/// - **Offset `0` → `N`**: **Payload** (encoded batch ops)
/// - **Offset `N` → `N + 4`**: **Op Count** (number of ops in the payload)
/// - **Offset `N + 4` → `N + 12`**: **Prev Offset** (absolute file offset where
///   this record starts, i.e. where the previous record ends)
/// - **Offset `N + 12` → `N + 16`**: **Checksum** (CRC32 of the payload and
///   of the two trailer fields before it)
///
/// **Total Size**: `N + 16` bytes.
///
/// ## Notes
/// - The `prev_offset` values form a backward-linked chain through the whole
///   file; a valid chain always terminates at offset `0`.
/// - The checksum is **not cryptographically secure** but detects torn or
///   corrupted tails.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub op_count: u32,     // 4 bytes
    pub prev_offset: u64,  // 8 bytes (absolute start offset of this record)
    pub checksum: [u8; 4], // 4 bytes (checksum for integrity)
}

impl RecordMetadata {
    pub fn new(op_count: u32, prev_offset: u64, checksum: [u8; 4]) -> Self {
        Self {
            op_count,
            prev_offset,
            checksum,
        }
    }

    /// Serializes the metadata into its fixed-size on-disk form.
    ///
    /// Numeric fields are little-endian.
    #[inline]
    pub fn serialize(&self) -> [u8; METADATA_SIZE] {
        let mut buf = [0u8; METADATA_SIZE];

        buf[OP_COUNT_RANGE].copy_from_slice(&self.op_count.to_le_bytes());
        buf[PREV_OFFSET_RANGE].copy_from_slice(&self.prev_offset.to_le_bytes());
        buf[CHECKSUM_RANGE].copy_from_slice(&self.checksum);

        buf
    }

    /// Deserializes a metadata block.
    ///
    /// Returns `None` if `data` is shorter than [`METADATA_SIZE`].
    #[inline]
    pub fn deserialize(data: &[u8]) -> Option<Self> {
        let data = data.get(..METADATA_SIZE)?;

        let mut op_count = [0u8; 4];
        op_count.copy_from_slice(&data[OP_COUNT_RANGE]);

        let mut prev_offset = [0u8; 8];
        prev_offset.copy_from_slice(&data[PREV_OFFSET_RANGE]);

        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&data[CHECKSUM_RANGE]);

        Some(Self {
            op_count: u32::from_le_bytes(op_count),
            prev_offset: u64::from_le_bytes(prev_offset),
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_layout_is_little_endian() {
        let metadata = RecordMetadata::new(3, 0x0102, [9, 8, 7, 6]);
        let bytes = metadata.serialize();

        assert_eq!(&bytes[OP_COUNT_RANGE], &[3, 0, 0, 0]);
        assert_eq!(&bytes[PREV_OFFSET_RANGE], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[CHECKSUM_RANGE], &[9, 8, 7, 6]);
        assert_eq!(RecordMetadata::deserialize(&bytes), Some(metadata));
    }

    #[test]
    fn test_short_metadata_is_rejected() {
        assert_eq!(RecordMetadata::deserialize(&[0u8; METADATA_SIZE - 1]), None);
    }
}
