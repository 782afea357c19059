//! # tidemark
//!
//! Time-indexed namespace store on top of an ordered, byte-keyed engine.
//!
//! Each **namespace** is an independent stream of timestamped values. The
//! store keeps the latest value of every namespace one lookup away, answers
//! inclusive time-range queries in either direction, and trims history below
//! a boundary into a single checkpoint that carries the last known value.
//!
//! Two engines ship with the crate:
//! - [`DataStore`]: a single append-only file, memory-mapped for zero-copy
//!   reads, with an ordered in-memory index and crash recovery.
//! - [`MemoryStore`]: a volatile `BTreeMap`.
//!
//! Any type implementing [`traits::KvReader`] and [`traits::KvWriter`] can be
//! used instead.
//!
//! ```no_run
//! use tidemark::{DataStore, ScanDirection, TimeSeriesStore};
//! use std::path::Path;
//!
//! let store = TimeSeriesStore::new(DataStore::open(Path::new("metrics.bin")).unwrap());
//!
//! store.put("cpu", b"0.42").unwrap();
//! let current = store.get_current("cpu").unwrap().unwrap();
//! assert_eq!(current.value, b"0.42");
//!
//! let history = store
//!     .get_range("cpu", 0, i64::MAX, Some(10), ScanDirection::Descending)
//!     .unwrap();
//! assert!(!history.is_empty());
//! ```

pub mod error;
pub use error::{Error, NamespaceFailure, Result};

pub mod storage_engine;
pub use storage_engine::traits;
pub use storage_engine::{DataStore, KeyRange, MemoryStore, ValueHandle, WriteBatch};

pub mod timeseries;
pub use timeseries::{
    Clock, Entry, ManualClock, NamespaceRegistry, RangeQuery, ScanDirection, SystemClock,
    TimeSeriesStore, TrimPlan, TrimStats,
};

pub mod utils;
