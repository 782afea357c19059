//! Single-process micro-benchmarks for the time-series layer on the
//! file-backed engine. Writes a few namespaces of history, then exercises
//! current-value lookups and bounded range scans in both directions.

use rand::{Rng, rng};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::tempdir;
use tidemark::{DataStore, ManualClock, RangeQuery, TimeSeriesStore};

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

const NAMESPACES: usize = 16;
const ENTRIES_PER_NAMESPACE: usize = 20_000;
const NUM_CURRENT_LOOKUPS: usize = 200_000;
const NUM_RANGE_QUERIES: usize = 20_000;
const RANGE_SPAN_MS: i64 = 500;

const T0: i64 = 1_700_000_000_000;

type Store = TimeSeriesStore<DataStore, Arc<ManualClock>>;

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("timeseries_bench.bin");

    println!("Running time-series benchmark…");
    let store = benchmark_puts(&path);
    benchmark_current_lookups(&store);
    benchmark_range_scans(&store);
    println!("✅ Benchmarks completed.");
}

// ---------------------------------------------------------------------------
// 1 ─ Puts (round-robin over namespaces, one ms apart)
// ---------------------------------------------------------------------------

fn benchmark_puts(path: &Path) -> Store {
    let clock = Arc::new(ManualClock::new(T0));
    let store = TimeSeriesStore::with_clock(
        DataStore::open(path).expect("Failed to open storage"),
        Arc::clone(&clock),
    );

    let total = NAMESPACES * ENTRIES_PER_NAMESPACE;
    let start_time = Instant::now();

    for i in 0..ENTRIES_PER_NAMESPACE {
        clock.advance(1);
        for n in 0..NAMESPACES {
            store
                .put(&format!("series-{n}"), (i as u64).to_le_bytes())
                .expect("Put failed");
        }
    }

    let dt = start_time.elapsed();
    println!(
        "Put {total} entries in {:#.3}s ({:#.3} puts/s)",
        dt.as_secs_f64(),
        total as f64 / dt.as_secs_f64()
    );

    store
}

// ---------------------------------------------------------------------------
// 2 ─ Current-value lookups
// ---------------------------------------------------------------------------

fn benchmark_current_lookups(store: &Store) {
    let mut rng = rng();
    let start_time = Instant::now();

    for _ in 0..NUM_CURRENT_LOOKUPS {
        let n = rng.random_range(0..NAMESPACES);
        let current = store
            .get_current(&format!("series-{n}"))
            .expect("Lookup failed")
            .expect("Missing current entry");
        assert_eq!(current.timestamp, T0 + ENTRIES_PER_NAMESPACE as i64);
    }

    let dt = start_time.elapsed();
    println!(
        "Looked up {NUM_CURRENT_LOOKUPS} current values in {:#.3}s ({:#.3} lookups/s)",
        dt.as_secs_f64(),
        NUM_CURRENT_LOOKUPS as f64 / dt.as_secs_f64()
    );
}

// ---------------------------------------------------------------------------
// 3 ─ Bounded range scans, alternating direction
// ---------------------------------------------------------------------------

fn benchmark_range_scans(store: &Store) {
    let mut rng = rng();
    let mut returned = 0usize;
    let start_time = Instant::now();

    for q in 0..NUM_RANGE_QUERIES {
        let n = rng.random_range(0..NAMESPACES);
        let begin = T0 + 1 + rng.random_range(0..ENTRIES_PER_NAMESPACE as i64 - RANGE_SPAN_MS);
        let mut query = RangeQuery::new(begin, begin + RANGE_SPAN_MS - 1);
        if q % 2 == 1 {
            query = query.descending();
        }

        let entries = store
            .get_range_with(&format!("series-{n}"), query)
            .expect("Range failed");
        assert_eq!(entries.len(), RANGE_SPAN_MS as usize);
        returned += entries.len();
    }

    let dt = start_time.elapsed();
    println!(
        "Ran {NUM_RANGE_QUERIES} range scans ({returned} entries) in {:#.3}s ({:#.3} entries/s)",
        dt.as_secs_f64(),
        returned as f64 / dt.as_secs_f64()
    );
}
