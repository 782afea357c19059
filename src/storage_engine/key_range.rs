/// Half-open byte range `[start, limit)` over engine keys.
///
/// A `limit` of `None` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub start: Vec<u8>,
    pub limit: Option<Vec<u8>>,
}

impl KeyRange {
    pub fn new(start: impl Into<Vec<u8>>, limit: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            limit: Some(limit.into()),
        }
    }

    /// Every key in the engine.
    pub fn all() -> Self {
        Self {
            start: Vec::new(),
            limit: None,
        }
    }

    /// Every key that begins with `prefix`.
    ///
    /// The limit is the shortest key greater than all keys sharing the prefix:
    /// trailing `0xFF` bytes are dropped and the last remaining byte is
    /// incremented. A prefix made only of `0xFF` bytes has no upper bound.
    pub fn prefix(prefix: &[u8]) -> Self {
        let mut limit = prefix.to_vec();
        while let Some(last) = limit.pop() {
            if last < u8::MAX {
                limit.push(last + 1);
                return Self {
                    start: prefix.to_vec(),
                    limit: Some(limit),
                };
            }
        }

        Self {
            start: prefix.to_vec(),
            limit: None,
        }
    }

    /// Returns `true` if `key` falls inside the range.
    #[inline]
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.start.as_slice() && self.limit.as_deref().is_none_or(|limit| key < limit)
    }

    /// Returns `true` if no key can satisfy the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(&self.limit, Some(limit) if limit.as_slice() <= self.start.as_slice())
    }
}
