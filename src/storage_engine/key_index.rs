use std::collections::BTreeMap;
use std::ops::Bound;

/// Where a live value sits inside the storage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueLocation {
    /// Absolute file offset of the first value byte.
    pub offset: u64,
    pub len: u32,
}

impl ValueLocation {
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// In-memory ordered key → value-location index.
///
/// Unlike a hash index this keeps the raw keys, so range scans walk keys in
/// ascending byte order. Deleted keys are removed outright.
#[derive(Debug, Default)]
pub struct KeyIndex {
    index: BTreeMap<Vec<u8>, ValueLocation>,
    /// Total payload bytes of live values, for compaction estimates.
    live_value_bytes: u64,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts/updates and returns the **previous location**, if any.
    #[inline]
    pub fn insert(&mut self, key: Vec<u8>, location: ValueLocation) -> Option<ValueLocation> {
        self.live_value_bytes += location.len as u64;
        let previous = self.index.insert(key, location);
        if let Some(previous) = previous {
            self.live_value_bytes -= previous.len as u64;
        }
        previous
    }

    #[inline]
    pub fn remove(&mut self, key: &[u8]) -> Option<ValueLocation> {
        let removed = self.index.remove(key);
        if let Some(removed) = removed {
            self.live_value_bytes -= removed.len as u64;
        }
        removed
    }

    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<ValueLocation> {
        self.index.get(key).copied()
    }

    /// First entry inside `(lower, upper)`.
    pub fn first_in(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Option<(&[u8], ValueLocation)> {
        if !is_valid_span(lower, upper) {
            return None;
        }
        self.index
            .range::<[u8], _>((lower, upper))
            .next()
            .map(|(key, location)| (key.as_slice(), *location))
    }

    /// Last entry inside `(lower, upper)`.
    pub fn last_in(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Option<(&[u8], ValueLocation)> {
        if !is_valid_span(lower, upper) {
            return None;
        }
        self.index
            .range::<[u8], _>((lower, upper))
            .next_back()
            .map(|(key, location)| (key.as_slice(), *location))
    }

    /// Iterates every live key in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], ValueLocation)> {
        self.index
            .iter()
            .map(|(key, location)| (key.as_slice(), *location))
    }

    #[inline]
    pub fn live_value_bytes(&self) -> u64 {
        self.live_value_bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// `BTreeMap::range` panics when the start lies after the end, or when both
/// bounds are the same excluded key; such spans are simply empty here.
pub(crate) fn is_valid_span(lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> bool {
    match (lower, upper) {
        (Bound::Included(l), Bound::Included(u)) => l <= u,
        (Bound::Included(l), Bound::Excluded(u))
        | (Bound::Excluded(l), Bound::Included(u))
        | (Bound::Excluded(l), Bound::Excluded(u)) => l < u,
        _ => true,
    }
}
