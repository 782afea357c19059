mod append_extension;
pub use append_extension::append_extension;

mod format_bytes;
pub use format_bytes::format_bytes;

mod parse_timestamp;
pub use parse_timestamp::parse_timestamp;

mod verify_file_existence;
pub use verify_file_existence::verify_file_existence;
