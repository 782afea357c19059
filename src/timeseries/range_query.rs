/// Order in which a range scan yields entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Oldest first, starting at `begin`.
    #[default]
    Ascending,
    /// Newest first, starting at `end`.
    Descending,
}

/// Builder for [`TimeSeriesStore::get_range_with`](crate::TimeSeriesStore::get_range_with).
///
/// Both bounds are inclusive. No limit and ascending order by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub begin: i64,
    pub end: i64,
    pub limit: Option<usize>,
    pub direction: ScanDirection,
}

impl RangeQuery {
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            limit: None,
            direction: ScanDirection::Ascending,
        }
    }

    /// Every timestamp from `0` upward.
    pub fn all() -> Self {
        Self::new(0, i64::MAX)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = ScanDirection::Descending;
        self
    }

    pub fn direction(mut self, direction: ScanDirection) -> Self {
        self.direction = direction;
        self
    }
}
