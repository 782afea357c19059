use crate::error::{Error, NamespaceFailure, Result};
use crate::storage_engine::WriteBatch;
use crate::storage_engine::traits::{KvCursor, KvEngine};
use crate::timeseries::key_codec::{
    belongs_to, encode_key, namespace_range, origin_key, time_range,
};
use crate::timeseries::{
    Clock, Entry, NamespaceRegistry, RangeQuery, ScanDirection, SystemClock, TrimPlan, TrimStats,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

/// Multi-namespace time series over an ordered key-value engine.
///
/// Each namespace is an independent stream of `(timestamp, value)` entries.
/// Every multi-key mutation (a put with its registry marker, a trim with its
/// checkpoint) reaches the engine as one atomic batch. The store adds no
/// locking of its own; it is as thread-safe as the engine it wraps.
pub struct TimeSeriesStore<E: KvEngine, C: Clock = SystemClock> {
    engine: E,
    clock: C,
}

impl<E: KvEngine> TimeSeriesStore<E> {
    /// Wraps `engine`, stamping entries with wall-clock time.
    pub fn new(engine: E) -> Self {
        Self::with_clock(engine, SystemClock)
    }
}

impl<E: KvEngine, C: Clock> TimeSeriesStore<E, C> {
    pub fn with_clock(engine: E, clock: C) -> Self {
        Self { engine, clock }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Releases the underlying engine.
    pub fn into_inner(self) -> E {
        self.engine
    }

    /// Appends `value` to `namespace` at the current clock time.
    ///
    /// If the namespace's current value is byte-identical to `value`, nothing
    /// is written and the existing current entry is returned instead. Only the
    /// immediately preceding value is compared.
    ///
    /// Two puts to one namespace within the same millisecond share a key; the
    /// later one replaces the earlier.
    ///
    /// # Returns:
    /// - `Ok(Entry)`: The new entry, or the unchanged current one.
    /// - `Err(Error)`: If the current value could not be read or the batch
    ///   could not be written. Nothing is written in that case.
    pub fn put(&self, namespace: &str, value: impl AsRef<[u8]>) -> Result<Entry> {
        let value = value.as_ref();

        if let Some(current) = self.get_current(namespace)? {
            if current.value == value {
                trace!(
                    "Skipping put to {:?}: value matches entry at {}.",
                    namespace, current.timestamp
                );
                return Ok(current);
            }
        }

        let entry = Entry::new(namespace, self.clock.now_millis(), value);

        let mut batch = WriteBatch::with_capacity(2);
        NamespaceRegistry::mark(&mut batch, namespace);
        batch.put(entry.key(), value);
        self.engine.write(batch)?;

        debug!(
            "Put {} byte(s) to {:?} at {}.",
            value.len(),
            namespace,
            entry.timestamp
        );

        Ok(entry)
    }

    /// Returns the entry with the largest timestamp in `namespace`.
    ///
    /// Positions a cursor on the last key of the namespace range and steps
    /// back over keys of nested namespaces (`namespace|x`), if any.
    pub fn get_current(&self, namespace: &str) -> Result<Option<Entry>> {
        let mut cursor = self.engine.cursor(namespace_range(namespace))?;

        let mut positioned = cursor.last()?;
        while positioned {
            if let (Some(key), Some(value)) = (cursor.key(), cursor.value()) {
                if belongs_to(key, namespace) {
                    return Ok(Some(Entry::from_raw(key, value)?));
                }
            }
            positioned = cursor.prev()?;
        }

        Ok(None)
    }

    /// Returns entries with `begin <= timestamp <= end`.
    ///
    /// `limit` of `None` is unlimited. `Descending` walks from `end` down to
    /// `begin`. An empty interval (including `begin > end`) yields an empty
    /// vector.
    pub fn get_range(
        &self,
        namespace: &str,
        begin: i64,
        end: i64,
        limit: Option<usize>,
        direction: ScanDirection,
    ) -> Result<Vec<Entry>> {
        let range = time_range(namespace, begin, end);
        if limit == Some(0) || range.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries = match limit {
            Some(limit) => Vec::with_capacity(limit.min(1024)),
            None => Vec::new(),
        };

        let mut cursor = self.engine.cursor(range)?;
        let mut positioned = match direction {
            ScanDirection::Ascending => cursor.first()?,
            ScanDirection::Descending => cursor.last()?,
        };

        while positioned {
            if let (Some(key), Some(value)) = (cursor.key(), cursor.value()) {
                if belongs_to(key, namespace) {
                    entries.push(Entry::from_raw(key, value)?);
                }
            }

            if limit.is_some_and(|limit| entries.len() >= limit) {
                break;
            }

            positioned = match direction {
                ScanDirection::Ascending => cursor.next()?,
                ScanDirection::Descending => cursor.prev()?,
            };
        }

        Ok(entries)
    }

    /// [`Self::get_range`] driven by a [`RangeQuery`].
    pub fn get_range_with(&self, namespace: &str, query: RangeQuery) -> Result<Vec<Entry>> {
        self.get_range(
            namespace,
            query.begin,
            query.end,
            query.limit,
            query.direction,
        )
    }

    /// Every namespace that has ever received an entry, ascending.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        NamespaceRegistry::list(&self.engine)
    }

    /// Computes, without writing, what [`Self::trim`] would commit.
    ///
    /// Scans `[origin, boundary]` ascending, deleting every key of
    /// `namespace` visited and keeping the value of the last one as the
    /// checkpoint. Keys of nested namespaces are left alone.
    pub fn plan_trim(&self, namespace: &str, boundary: i64) -> Result<TrimPlan> {
        let range = time_range(namespace, 0, boundary);
        debug_assert_eq!(range.start, origin_key(namespace));

        let mut plan = TrimPlan::new(namespace);
        if range.is_empty() {
            return Ok(plan);
        }

        let mut cursor = self.engine.cursor(range)?;
        let mut last_value = None;

        let mut positioned = cursor.first()?;
        while positioned {
            if let (Some(key), Some(value)) = (cursor.key(), cursor.value()) {
                if belongs_to(key, namespace) {
                    plan.deletes.push(key.to_vec());
                    last_value = Some(value.to_vec());
                }
            }
            positioned = cursor.next()?;
        }

        plan.checkpoint = last_value.map(|value| (encode_key(namespace, boundary), value));

        Ok(plan)
    }

    /// Collapses everything in `namespace` at or below `boundary` into one
    /// checkpoint entry at exactly `boundary`.
    ///
    /// The checkpoint carries the latest value at or below the boundary, so
    /// reads at or after the boundary see the same value as before. The
    /// deletes and the checkpoint are one batch. With nothing at or below the
    /// boundary, nothing is written.
    pub fn trim(&self, namespace: &str, boundary: i64) -> Result<TrimStats> {
        let plan = self.plan_trim(namespace, boundary)?;
        if plan.is_empty() {
            debug!("Nothing to trim in {:?} at {}.", namespace, boundary);
            return Ok(TrimStats::default());
        }

        let mut batch = WriteBatch::with_capacity(plan.deletes.len() + 1);
        let stats = plan.stage_into(&mut batch);
        self.engine.write(batch)?;

        info!("Trimmed {:?} at {}: {}.", namespace, boundary, stats);

        Ok(stats)
    }

    /// Trims every registered namespace at `boundary` in a single batch.
    ///
    /// Plans are built per namespace (in parallel with the `parallel`
    /// feature), each task returning its own result. If any plan fails,
    /// nothing is written and every failure is returned in
    /// [`Error::TrimAll`].
    pub fn trim_all(&self, boundary: i64) -> Result<TrimStats> {
        let namespaces = self.namespaces()?;

        let outcomes = self.plan_all(namespaces, boundary);

        let mut plans = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (namespace, outcome) in outcomes {
            match outcome {
                Ok(plan) => plans.push(plan),
                Err(error) => {
                    warn!("Failed to plan trim of {:?}: {}", namespace, error);
                    failures.push(NamespaceFailure { namespace, error });
                }
            }
        }

        if !failures.is_empty() {
            return Err(Error::TrimAll { failures });
        }

        let mut batch = WriteBatch::with_capacity(
            plans
                .iter()
                .map(|plan| plan.deletes.len() + usize::from(plan.checkpoint.is_some()))
                .sum(),
        );
        let mut stats = TrimStats::default();
        for plan in plans {
            stats += plan.stage_into(&mut batch);
        }

        if batch.is_empty() {
            debug!("Nothing to trim at {}.", boundary);
            return Ok(stats);
        }

        self.engine.write(batch)?;
        info!("Trimmed all namespaces at {}: {}.", boundary, stats);

        Ok(stats)
    }

    #[cfg(feature = "parallel")]
    fn plan_all(&self, namespaces: Vec<String>, boundary: i64) -> Vec<(String, Result<TrimPlan>)> {
        namespaces
            .into_par_iter()
            .map(|namespace| {
                let outcome = self.plan_trim(&namespace, boundary);
                (namespace, outcome)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn plan_all(&self, namespaces: Vec<String>, boundary: i64) -> Vec<(String, Result<TrimPlan>)> {
        namespaces
            .into_iter()
            .map(|namespace| {
                let outcome = self.plan_trim(&namespace, boundary);
                (namespace, outcome)
            })
            .collect()
    }
}
