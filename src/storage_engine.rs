mod checksum;

mod constants;

mod data_store;
pub use data_store::DataStore;

mod key_index;
pub use key_index::{KeyIndex, ValueLocation};

mod key_range;
pub use key_range::KeyRange;

mod memory_store;
pub use memory_store::MemoryStore;

mod range_cursor;
pub use range_cursor::{CursorSource, RangeCursor};

mod record_codec;

mod record_metadata;
pub use record_metadata::RecordMetadata;

mod value_handle;
pub use value_handle::ValueHandle;

mod write_batch;
pub use write_batch::{BatchOp, WriteBatch};

pub mod traits;

#[cfg(feature = "expose-internal-api")]
pub mod internals {
    pub use super::checksum::{compute_checksum, verify_checksum};
    pub use super::constants::*;
    pub use super::record_codec::{DecodedOp, decode_ops, encode_ops};
}
