//! Core tracking engine: entries, ledgers, migration, metrics and persistence.

pub mod analytics;
pub mod coerce;
pub mod config;
pub mod dashboard;
pub mod entry;
pub mod ledger;
pub mod log;
pub mod migration;
pub mod persistence;
pub mod registry;
pub mod storage;

// Re-export main types for cleaner imports
pub use dashboard::{Clock, Dashboard, FixedClock, SystemClock};
pub use entry::{Entry, EntryUpdate};
pub use ledger::{BusinessLedger, Portfolio};
pub use registry::BusinessId;
pub use storage::KeyValueStore;
