use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tidemark::storage_engine::RangeCursor;
use tidemark::traits::{KvReader, KvWriter};
use tidemark::{
    Clock, Entry, Error, KeyRange, ManualClock, MemoryStore, RangeQuery, ScanDirection, TimeSeriesStore,
    TrimStats, WriteBatch,
};

const T0: i64 = 1_700_000_000_000;

/// Engine wrapper whose scans fail inside chosen namespaces and which counts
/// committed batches.
#[derive(Default)]
struct FlakyEngine {
    inner: MemoryStore,
    failing_prefixes: Vec<Vec<u8>>,
    writes: AtomicUsize,
}

impl KvReader for FlakyEngine {
    type Cursor<'a> = RangeCursor<'a, MemoryStore>;

    fn get(&self, key: &[u8]) -> io::Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn cursor(&self, range: KeyRange) -> io::Result<Self::Cursor<'_>> {
        if self
            .failing_prefixes
            .iter()
            .any(|prefix| range.start.starts_with(prefix))
        {
            return Err(io::Error::other("simulated read failure"));
        }
        self.inner.cursor(range)
    }
}

impl KvWriter for FlakyEngine {
    fn write(&self, batch: WriteBatch) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(batch)
    }
}

fn create_store<E: tidemark::traits::KvEngine>(
    engine: E,
) -> (Arc<ManualClock>, TimeSeriesStore<E, Arc<ManualClock>>) {
    let clock = Arc::new(ManualClock::new(T0));
    let store = TimeSeriesStore::with_clock(engine, Arc::clone(&clock));
    (clock, store)
}

/// Puts `values` 1s apart; returns their timestamps.
fn put_values<E: tidemark::traits::KvEngine>(
    clock: &ManualClock,
    store: &TimeSeriesStore<E, Arc<ManualClock>>,
    namespace: &str,
    values: &[&str],
) -> Vec<i64> {
    values
        .iter()
        .map(|value| {
            clock.advance(1_000);
            store.put(namespace, value).unwrap().timestamp
        })
        .collect()
}

#[test]
fn test_trim_keeps_last_value_at_boundary() {
    let (clock, store) = create_store(MemoryStore::new());
    let ts = put_values(&clock, &store, "ns", &["a", "b", "c"]);

    let stats = store.trim("ns", ts[2]).unwrap();
    assert_eq!(
        stats,
        TrimStats {
            namespaces: 1,
            deleted: 3,
            checkpoints: 1
        }
    );

    let remaining = store
        .get_range("ns", 0, ts[2], None, ScanDirection::Ascending)
        .unwrap();
    assert_eq!(remaining, vec![Entry::new("ns", ts[2], b"c".to_vec())]);
}

#[test]
fn test_trim_between_entries_synthesizes_checkpoint() {
    let (clock, store) = create_store(MemoryStore::new());
    let ts = put_values(&clock, &store, "ns", &["a", "b", "c"]);
    let boundary = ts[1] + 500;

    store.trim("ns", boundary).unwrap();

    let all = store.get_range_with("ns", RangeQuery::all()).unwrap();
    assert_eq!(
        all,
        vec![
            Entry::new("ns", boundary, b"b".to_vec()),
            Entry::new("ns", ts[2], b"c".to_vec()),
        ]
    );
    assert_eq!(store.get_current("ns").unwrap().unwrap().value, b"c");
}

#[test]
fn test_trim_below_history_writes_nothing() {
    let engine = FlakyEngine::default();
    let (clock, store) = create_store(engine);
    put_values(&clock, &store, "ns", &["a"]);
    let writes_before = store.engine().writes.load(Ordering::SeqCst);

    let stats = store.trim("ns", T0 - 1).unwrap();

    assert_eq!(stats, TrimStats::default());
    assert_eq!(store.engine().writes.load(Ordering::SeqCst), writes_before);
    assert_eq!(store.get_range_with("ns", RangeQuery::all()).unwrap().len(), 1);
}

#[test]
fn test_trim_is_idempotent_on_exact_boundary() {
    let (clock, store) = create_store(MemoryStore::new());
    let ts = put_values(&clock, &store, "ns", &["a", "b"]);

    store.trim("ns", ts[1]).unwrap();
    let before = store.get_range_with("ns", RangeQuery::all()).unwrap();
    store.trim("ns", ts[1]).unwrap();
    let after = store.get_range_with("ns", RangeQuery::all()).unwrap();

    assert_eq!(before, after);
    assert_eq!(after, vec![Entry::new("ns", ts[1], b"b".to_vec())]);
}

#[test]
fn test_trim_does_not_touch_sibling_namespace() {
    let (clock, store) = create_store(MemoryStore::new());
    put_values(&clock, &store, "ns", &["a", "b"]);
    put_values(&clock, &store, "ns2", &["x", "y"]);

    store.trim("ns", i64::MAX).unwrap();

    assert_eq!(store.get_range_with("ns", RangeQuery::all()).unwrap().len(), 1);
    assert_eq!(store.get_range_with("ns2", RangeQuery::all()).unwrap().len(), 2);
}

#[test]
fn test_trim_does_not_touch_nested_namespace() {
    let (clock, store) = create_store(MemoryStore::new());
    put_values(&clock, &store, "a", &["mine"]);
    let other = put_values(&clock, &store, "a|0", &["other"]);
    let boundary = other[0] + 1;

    let stats = store.trim("a", boundary).unwrap();
    assert_eq!(stats.deleted, 1);

    assert_eq!(
        store.get_range_with("a", RangeQuery::all()).unwrap(),
        vec![Entry::new("a", boundary, b"mine".to_vec())]
    );
    assert_eq!(
        store.get_range_with("a|0", RangeQuery::all()).unwrap(),
        vec![Entry::new("a|0", other[0], b"other".to_vec())]
    );
}

#[test]
fn test_trim_all_is_namespace_scoped() {
    let (clock, store) = create_store(MemoryStore::new());
    let mut boundaries = Vec::new();
    for namespace in ["alpha", "beta"] {
        let ts = put_values(&clock, &store, namespace, &["1", "2", "3", "4"]);
        boundaries.push(ts[2]);
    }
    // Both namespaces share one boundary: the third put of the later one.
    let boundary = boundaries[1];

    let stats = store.trim_all(boundary).unwrap();
    assert_eq!(stats.namespaces, 2);
    assert_eq!(stats.checkpoints, 2);

    // alpha was entirely at or below the boundary.
    assert_eq!(
        store.get_range_with("alpha", RangeQuery::all()).unwrap(),
        vec![Entry::new("alpha", boundary, b"4".to_vec())]
    );

    let beta = store.get_range_with("beta", RangeQuery::all()).unwrap();
    assert_eq!(beta.len(), 2);
    assert_eq!(beta[0], Entry::new("beta", boundary, b"3".to_vec()));
    assert_eq!(store.get_current("beta").unwrap().unwrap().value, b"4");
}

#[test]
fn test_trim_all_with_matching_boundaries() {
    let (clock, store) = create_store(MemoryStore::new());

    // Interleave puts so the third put of both namespaces lands on one tick.
    for value in ["1", "2", "3", "4"] {
        clock.advance(1_000);
        store.put("alpha", value).unwrap();
        store.put("beta", value).unwrap();
    }
    let boundary = T0 + 3_000;

    store.trim_all(boundary).unwrap();

    for namespace in ["alpha", "beta"] {
        let history = store
            .get_range(namespace, 0, boundary, None, ScanDirection::Ascending)
            .unwrap();
        assert_eq!(history, vec![Entry::new(namespace, boundary, b"3".to_vec())]);
        assert_eq!(store.get_current(namespace).unwrap().unwrap().value, b"4");
    }
}

#[test]
fn test_trim_all_reports_every_failure_and_commits_nothing() {
    let engine = FlakyEngine {
        failing_prefixes: vec![b"bad1|".to_vec(), b"bad2|".to_vec()],
        ..FlakyEngine::default()
    };
    let (clock, store) = create_store(engine);

    // Seed directly so puts do not trip the failing scans.
    for namespace in ["bad1", "bad2", "good"] {
        clock.advance(1_000);
        let mut batch = WriteBatch::new();
        tidemark::NamespaceRegistry::mark(&mut batch, namespace);
        batch.put(format!("{namespace}|{}", clock.now_millis()), b"v".to_vec());
        store.engine().inner.write(batch).unwrap();
    }
    let writes_before = store.engine().writes.load(Ordering::SeqCst);

    let err = store.trim_all(i64::MAX).unwrap_err();

    match err {
        Error::TrimAll { failures } => {
            let mut names: Vec<&str> = failures.iter().map(|f| f.namespace.as_str()).collect();
            names.sort();
            assert_eq!(names, vec!["bad1", "bad2"]);
            assert!(failures.iter().all(|f| matches!(f.error, Error::Engine(_))));
        }
        other => panic!("expected TrimAll, got {other:?}"),
    }

    assert_eq!(store.engine().writes.load(Ordering::SeqCst), writes_before);
    assert_eq!(
        store.get_range_with("good", RangeQuery::all()).unwrap().len(),
        1,
        "no namespace may be trimmed when any plan fails"
    );
}

#[test]
fn test_trim_all_on_empty_store() {
    let (_clock, store) = create_store(MemoryStore::new());
    assert_eq!(store.trim_all(T0).unwrap(), TrimStats::default());
}
