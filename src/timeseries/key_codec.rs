//! Mapping between `(namespace, timestamp)` pairs and engine keys.
//!
//! A data key is `namespace ++ b'|' ++ decimal(timestamp)`. Timestamps are
//! written without zero-padding, so byte order only matches timestamp order
//! while every timestamp in a namespace is non-negative and has the same
//! number of decimal digits. Epoch milliseconds keep 13 digits until the year
//! 2286; callers storing other time bases must keep that width constant.

use crate::error::{Error, Result};
use crate::storage_engine::KeyRange;
use crate::timeseries::constants::{KEY_SEPARATOR, MAX_TIMESTAMP_DIGITS};

/// Encodes `(namespace, timestamp)` into an engine key.
pub fn encode_key(namespace: &str, timestamp: i64) -> Vec<u8> {
    let mut key = namespace_prefix(namespace);
    key.extend_from_slice(timestamp.to_string().as_bytes());
    key
}

/// Splits `key` at its **last** separator.
///
/// Everything before it is the namespace (which may itself contain `|`);
/// the final segment must parse as a base-10 `i64`.
///
/// # Returns:
/// - `Err(Error::MalformedKey)` if there is no separator, the timestamp does
///   not parse, or the namespace is not UTF-8.
pub fn decode_key(key: &[u8]) -> Result<(String, i64)> {
    let split = key
        .iter()
        .rposition(|byte| *byte == KEY_SEPARATOR)
        .ok_or_else(|| Error::malformed_key(key, "missing namespace separator"))?;

    let (namespace, timestamp) = (&key[..split], &key[split + 1..]);

    let timestamp = std::str::from_utf8(timestamp)
        .ok()
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| Error::malformed_key(key, "timestamp is not a base-10 integer"))?;

    let namespace = String::from_utf8(namespace.to_vec())
        .map_err(|_| Error::malformed_key(key, "namespace is not valid UTF-8"))?;

    Ok((namespace, timestamp))
}

/// `namespace ++ b'|'`; every key of the namespace starts with it.
pub fn namespace_prefix(namespace: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(namespace.len() + 1 + MAX_TIMESTAMP_DIGITS);
    prefix.extend_from_slice(namespace.as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix
}

/// Whether `key`, taken from [`namespace_range`], is a key of `namespace`
/// itself rather than of a nested namespace such as `namespace|x`.
///
/// The owner of a key is decided by its last separator, as in [`decode_key`].
pub fn belongs_to(key: &[u8], namespace: &str) -> bool {
    key.starts_with(namespace.as_bytes())
        && key.iter().rposition(|byte| *byte == KEY_SEPARATOR) == Some(namespace.len())
}

/// Every key of `namespace` and nothing of a sibling such as `namespace2`.
///
/// Keys of nested namespaces (`namespace|x`) share the prefix and fall
/// inside the range too; scans filter them with [`belongs_to`].
pub fn namespace_range(namespace: &str) -> KeyRange {
    KeyRange::prefix(&namespace_prefix(namespace))
}

/// Key of timestamp `0`, the lower bound of a namespace's history.
pub fn origin_key(namespace: &str) -> Vec<u8> {
    encode_key(namespace, 0)
}

/// Half-open engine range covering the closed interval `[begin, end]`.
///
/// When `end` is `i64::MAX` the limit falls back to the namespace's upper
/// bound. `begin > end` yields an empty range.
pub fn time_range(namespace: &str, begin: i64, end: i64) -> KeyRange {
    let start = encode_key(namespace, begin);
    let limit = match end.checked_add(1) {
        Some(after_end) => Some(encode_key(namespace, after_end)),
        None => namespace_range(namespace).limit,
    };

    KeyRange { start, limit }
}
