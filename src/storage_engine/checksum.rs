use crate::storage_engine::RecordMetadata;
use crc32fast::Hasher as Crc32FastHasher;

/// CRC32 over a record payload followed by the trailer fields that precede
/// the checksum (`op_count`, then `prev_offset`, both little-endian).
///
/// `crc32fast` picks a SIMD implementation (PCLMULQDQ / ARMv8 CRC) at runtime
/// when one is available.
#[inline]
pub fn compute_checksum(payload: &[u8], op_count: u32, prev_offset: u64) -> [u8; 4] {
    let mut hasher = Crc32FastHasher::new();
    hasher.update(payload);
    hasher.update(&op_count.to_le_bytes());
    hasher.update(&prev_offset.to_le_bytes());
    hasher.finalize().to_le_bytes()
}

#[inline]
pub fn verify_checksum(payload: &[u8], metadata: &RecordMetadata) -> bool {
    compute_checksum(payload, metadata.op_count, metadata.prev_offset) == metadata.checksum
}
