use crate::storage_engine::KeyRange;
use crate::storage_engine::key_index::is_valid_span;
use crate::storage_engine::traits::KvCursor;
use std::io::Result;
use std::ops::Bound;

/// Ordered point lookups an engine exposes so [`RangeCursor`] can walk it.
///
/// Each call locates a single entry and releases any lock before returning,
/// so a cursor never pins the engine between steps.
pub trait CursorSource {
    type Value: AsRef<[u8]>;

    /// Smallest entry with a key inside `(lower, upper)`.
    fn locate_first(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, Self::Value)>>;

    /// Largest entry with a key inside `(lower, upper)`.
    fn locate_last(
        &self,
        lower: Bound<&[u8]>,
        upper: Bound<&[u8]>,
    ) -> Result<Option<(Vec<u8>, Self::Value)>>;
}

/// Bidirectional cursor that re-seeks the live index on every step.
///
/// Every move is an `O(log n)` lookup relative to the current key. The cursor
/// is not a snapshot: writes committed after it was opened are visible to
/// later steps.
pub struct RangeCursor<'a, S: CursorSource> {
    source: &'a S,
    range: KeyRange,
    current: Option<(Vec<u8>, S::Value)>,
}

impl<'a, S: CursorSource> RangeCursor<'a, S> {
    pub fn new(source: &'a S, range: KeyRange) -> Self {
        Self {
            source,
            range,
            current: None,
        }
    }

    pub fn range(&self) -> &KeyRange {
        &self.range
    }

    fn upper(&self) -> Bound<&[u8]> {
        match &self.range.limit {
            Some(limit) => Bound::Excluded(limit.as_slice()),
            None => Bound::Unbounded,
        }
    }

    fn settle(&mut self, found: Option<(Vec<u8>, S::Value)>) -> bool {
        self.current = found;
        self.current.is_some()
    }
}

impl<S: CursorSource> KvCursor for RangeCursor<'_, S> {
    fn first(&mut self) -> Result<bool> {
        let found = self
            .source
            .locate_first(Bound::Included(self.range.start.as_slice()), self.upper())?;
        Ok(self.settle(found))
    }

    fn last(&mut self) -> Result<bool> {
        let found = self
            .source
            .locate_last(Bound::Included(self.range.start.as_slice()), self.upper())?;
        Ok(self.settle(found))
    }

    fn next(&mut self) -> Result<bool> {
        let found = match &self.current {
            None => return self.first(),
            Some((key, _)) => {
                let lower = Bound::Excluded(key.as_slice());
                self.source.locate_first(lower, self.upper())?
            }
        };
        Ok(self.settle(found))
    }

    fn prev(&mut self) -> Result<bool> {
        let found = match &self.current {
            None => return self.last(),
            Some((key, _)) => {
                let lower = Bound::Included(self.range.start.as_slice());
                self.source.locate_last(lower, Bound::Excluded(key.as_slice()))?
            }
        };
        Ok(self.settle(found))
    }

    fn seek(&mut self, key: &[u8]) -> Result<bool> {
        let lower = key.max(self.range.start.as_slice());
        let upper = self.upper();
        if !is_valid_span(Bound::Included(lower), upper) {
            return Ok(self.settle(None));
        }
        let found = self.source.locate_first(Bound::Included(lower), upper)?;
        Ok(self.settle(found))
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(key, _)| key.as_slice())
    }

    fn value(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(_, value)| value.as_ref())
    }
}
