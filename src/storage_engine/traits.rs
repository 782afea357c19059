mod cursor;
pub use cursor::KvCursor;

mod reader;
pub use reader::KvReader;

mod writer;
pub use writer::KvWriter;

/// An ordered, byte-keyed engine the time-series layer can run on.
///
/// Implemented automatically for anything that reads, writes and can be
/// shared across threads.
pub trait KvEngine: KvReader + KvWriter + Send + Sync {}

impl<T: KvReader + KvWriter + Send + Sync> KvEngine for T {}
