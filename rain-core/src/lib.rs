//! Core types for daily rainfall records.
//!
//! Holds the observation model and the JSON dataset loader, the calendar
//! period keys every aggregation groups by, and the immutable snapshot
//! store that callers share between concurrent computations.

pub mod date_range;
pub mod observation;
pub mod period;
pub mod store;

pub use observation::{Observation, RainfallDataset};
pub use period::{CyclicGranularity, Granularity, PeriodKey};
pub use store::{RecordStore, Snapshot};
