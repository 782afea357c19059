pub mod constants;

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod entry;
pub use entry::Entry;

pub mod key_codec;

mod namespace_registry;
pub use namespace_registry::NamespaceRegistry;

mod range_query;
pub use range_query::{RangeQuery, ScanDirection};

mod time_series_store;
pub use time_series_store::TimeSeriesStore;

mod trim_plan;
pub use trim_plan::{TrimPlan, TrimStats};
