use memmap2::Mmap;
use std::ops::Range;
use std::sync::Arc;

/// Zero-copy owner of a value stored in an `Arc<Mmap>`.
///
/// Keeps the mapping alive for as long as the handle exists, so the bytes
/// stay valid even after the store remaps its file.
#[derive(Debug, Clone)]
pub struct ValueHandle {
    pub(in crate::storage_engine) mmap_arc: Arc<Mmap>,
    pub(in crate::storage_engine) range: Range<usize>,
}

impl ValueHandle {
    /// Returns the value bytes without copying.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap_arc[self.range.clone()]
    }

    /// Copies the value out of the mapping.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Absolute file offsets covered by the value.
    pub fn offset_range(&self) -> Range<u64> {
        self.range.start as u64..self.range.end as u64
    }
}

impl std::ops::Deref for ValueHandle {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl PartialEq<[u8]> for ValueHandle {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for ValueHandle {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl PartialEq<Vec<u8>> for ValueHandle {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl AsRef<[u8]> for ValueHandle {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
