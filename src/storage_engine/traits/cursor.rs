use std::io::Result;

/// Bidirectional cursor over a half-open key range.
///
/// Positioning methods return `Ok(true)` when the cursor lands on an entry
/// inside its range and `Ok(false)` when it runs off either end, after which
/// the cursor is unpositioned. `key` and `value` return `None` while
/// unpositioned.
pub trait KvCursor {
    /// Moves to the smallest key in range.
    fn first(&mut self) -> Result<bool>;

    /// Moves to the largest key in range.
    fn last(&mut self) -> Result<bool>;

    /// Moves to the next larger key. Behaves like `first` when unpositioned.
    fn next(&mut self) -> Result<bool>;

    /// Moves to the next smaller key. Behaves like `last` when unpositioned.
    fn prev(&mut self) -> Result<bool>;

    /// Moves to the smallest key in range that is `>= key`.
    fn seek(&mut self, key: &[u8]) -> Result<bool>;

    fn key(&self) -> Option<&[u8]>;

    fn value(&self) -> Option<&[u8]>;

    #[inline]
    fn is_valid(&self) -> bool {
        self.key().is_some()
    }
}
