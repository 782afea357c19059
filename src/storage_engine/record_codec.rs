//! Encoding of batch ops inside a record payload.
//!
//! ```text
//! put:    [0x01][key_len u32 LE][key][value_len u32 LE][value]
//! delete: [0x02][key_len u32 LE][key]
//! ```

use crate::storage_engine::constants::*;
use crate::storage_engine::{BatchOp, WriteBatch};
use std::io::{Error, ErrorKind, Result};
use std::ops::Range;

/// One op decoded from a payload, with the value located relative to the
/// start of that payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedOp<'a> {
    Put { key: &'a [u8], value: Range<usize> },
    Delete { key: &'a [u8] },
}

/// Serializes `batch` into a record payload.
///
/// Returns the payload and the relative value ranges of every put, in op
/// order (deletes contribute `None`).
pub fn encode_ops(batch: &WriteBatch) -> Result<(Vec<u8>, Vec<Option<Range<usize>>>)> {
    let capacity = batch
        .ops()
        .iter()
        .map(|op| match op {
            BatchOp::Put { key, value } => 1 + 2 * LEN_PREFIX_SIZE + key.len() + value.len(),
            BatchOp::Delete { key } => 1 + LEN_PREFIX_SIZE + key.len(),
        })
        .sum();

    let mut payload = Vec::with_capacity(capacity);
    let mut value_ranges = Vec::with_capacity(batch.len());

    for op in batch {
        match op {
            BatchOp::Put { key, value } => {
                payload.push(OP_PUT);
                write_len_prefixed(&mut payload, key)?;
                let value_start = payload.len() + LEN_PREFIX_SIZE;
                write_len_prefixed(&mut payload, value)?;
                value_ranges.push(Some(value_start..value_start + value.len()));
            }
            BatchOp::Delete { key } => {
                payload.push(OP_DELETE);
                write_len_prefixed(&mut payload, key)?;
                value_ranges.push(None);
            }
        }
    }

    Ok((payload, value_ranges))
}

/// Parses exactly `op_count` ops out of `payload`.
///
/// Fails with `ErrorKind::InvalidData` on an unknown tag, a length running
/// past the payload, or trailing bytes after the last op.
pub fn decode_ops(payload: &[u8], op_count: u32) -> Result<Vec<DecodedOp<'_>>> {
    // Every op takes at least one byte, so a larger count is already invalid.
    let mut ops = Vec::with_capacity((op_count as usize).min(payload.len()));
    let mut cursor = 0usize;

    for _ in 0..op_count {
        let tag = *payload
            .get(cursor)
            .ok_or_else(|| corrupt("record payload ended before op tag"))?;
        cursor += 1;

        let key_range = read_len_prefixed(payload, &mut cursor)?;
        let key = &payload[key_range];

        match tag {
            OP_PUT => {
                let value = read_len_prefixed(payload, &mut cursor)?;
                ops.push(DecodedOp::Put { key, value });
            }
            OP_DELETE => ops.push(DecodedOp::Delete { key }),
            _ => return Err(corrupt("unknown op tag in record payload")),
        }
    }

    if cursor != payload.len() {
        return Err(corrupt("trailing bytes after last op in record payload"));
    }

    Ok(ops)
}

fn write_len_prefixed(buffer: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("key or value of {} bytes exceeds the 4 GiB limit", bytes.len()),
        )
    })?;
    buffer.extend_from_slice(&len.to_le_bytes());
    buffer.extend_from_slice(bytes);
    Ok(())
}

fn read_len_prefixed(payload: &[u8], cursor: &mut usize) -> Result<Range<usize>> {
    let prefix = payload
        .get(*cursor..*cursor + LEN_PREFIX_SIZE)
        .ok_or_else(|| corrupt("record payload ended inside a length prefix"))?;

    let mut len = [0u8; LEN_PREFIX_SIZE];
    len.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len) as usize;

    let start = *cursor + LEN_PREFIX_SIZE;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= payload.len())
        .ok_or_else(|| corrupt("length prefix runs past the record payload"))?;

    *cursor = end;
    Ok(start..end)
}

fn corrupt(message: &'static str) -> Error {
    Error::new(ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reports_value_ranges() {
        let mut batch = WriteBatch::new();
        batch
            .put(b"k1".to_vec(), b"hello".to_vec())
            .delete(b"k2".to_vec())
            .put(b"k3".to_vec(), Vec::new());

        let (payload, ranges) = encode_ops(&batch).unwrap();

        assert_eq!(ranges.len(), 3);
        assert_eq!(&payload[ranges[0].clone().unwrap()], b"hello");
        assert!(ranges[1].is_none());
        assert!(ranges[2].as_ref().unwrap().is_empty());

        let decoded = decode_ops(&payload, 3).unwrap();
        assert_eq!(
            decoded[1],
            DecodedOp::Delete {
                key: b"k2".as_slice()
            }
        );
        match &decoded[0] {
            DecodedOp::Put { key, value } => {
                assert_eq!(*key, b"k1");
                assert_eq!(&payload[value.clone()], b"hello");
            }
            other => panic!("expected put, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let mut batch = WriteBatch::new();
        batch.put(b"key".to_vec(), b"value".to_vec());
        let (payload, _) = encode_ops(&batch).unwrap();

        let err = decode_ops(&payload[..payload.len() - 1], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_rejects_op_count_mismatch() {
        let mut batch = WriteBatch::new();
        batch.delete(b"a".to_vec()).delete(b"b".to_vec());
        let (payload, _) = encode_ops(&batch).unwrap();

        assert!(decode_ops(&payload, 1).is_err(), "trailing op must be flagged");
        assert!(decode_ops(&payload, 3).is_err(), "missing op must be flagged");
    }

    #[test]
    fn test_decode_rejects_huge_op_count() {
        let mut batch = WriteBatch::new();
        batch.delete(b"a".to_vec());
        let (payload, _) = encode_ops(&batch).unwrap();

        assert_eq!(
            decode_ops(&payload, u32::MAX).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let payload = [0x7Fu8, 0, 0, 0, 0];
        assert_eq!(
            decode_ops(&payload, 1).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }
}
