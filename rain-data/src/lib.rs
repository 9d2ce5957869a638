//! Period aggregation and comparison engine for daily rainfall.
//!
//! Every function here is pure: it borrows a slice of observations (and,
//! where relevant, a reference date standing in for "today") and returns
//! freshly built result rows. Nothing reads the clock and nothing is
//! cached between calls.
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rain_core::{CyclicGranularity, Granularity, Observation, PeriodKey};
//! use rain_data::{aggregate, compare_to_trailing, sort_periods, SortOrder};
//!
//! let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//! let observations = vec![
//!     Observation::new(day(2024, 1, 15), 10.0),
//!     Observation::new(day(2024, 2, 10), 5.0),
//!     Observation::new(day(2023, 1, 20), 3.0),
//! ];
//! let known = vec![
//!     PeriodKey::Absolute("2023".to_string()),
//!     PeriodKey::Absolute("2024".to_string()),
//! ];
//!
//! let yearly = aggregate(&observations, known, Granularity::Year);
//! let driest_first = sort_periods(yearly, SortOrder::ValueAscending);
//! assert_eq!(driest_first[0].period.as_str(), "2023");
//!
//! let monthly = compare_to_trailing(&observations, CyclicGranularity::Month, day(2024, 3, 1));
//! assert_eq!(monthly[0].average, 6.5);
//! ```

pub mod aggregate;
pub mod dry_spell;
pub mod models;
pub mod running;
pub mod sort;
pub mod trailing;

pub use aggregate::aggregate;
pub use dry_spell::{dry_spells_overlapping, find_dry_spells, longest_dry_spells, summarize_dry_spells};
pub use models::{DailyPoint, DrySpell, DrySpellSummary, PeriodComparison, PeriodTotal, RunningSeries};
pub use running::{build_running_series, build_running_series_with, RunningMode};
pub use sort::{sort_periods, Ranked, SortOrder};
pub use trailing::{compare_to_trailing, compare_to_trailing_window, trailing_window_bounds, TrailingWindow};
