use std::ops::Range;

// Metadata structure (fixed 16 bytes at the end of each record)
pub const METADATA_SIZE: usize = 16;

pub const OP_COUNT_RANGE: Range<usize> = 0..4;
pub const PREV_OFFSET_RANGE: Range<usize> = 4..12;
pub const CHECKSUM_RANGE: Range<usize> = 12..16;

// Define checksum length explicitly since `CHECKSUM_RANGE.len()` isn't `const`
pub const CHECKSUM_LEN: usize = CHECKSUM_RANGE.end - CHECKSUM_RANGE.start;

/// Op tags inside a record payload.
pub const OP_PUT: u8 = 0x01;
pub const OP_DELETE: u8 = 0x02;

/// Width of the little-endian length prefixes on keys and values.
pub const LEN_PREFIX_SIZE: usize = 4;

/// Maximum number of ops packed into one record while compacting.
pub const COMPACTION_RECORD_OPS: usize = 4096;
