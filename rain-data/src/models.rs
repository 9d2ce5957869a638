//! Result model structs produced by the aggregation engine.
//!
//! All structs derive `Serialize` so report writers can hand them straight
//! to `serde_json` or `csv`.

use chrono::NaiveDate;
use rain_core::PeriodKey;
use serde::Serialize;

/// Rainfall summed over one period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodTotal {
    pub period: PeriodKey,
    /// Millimetres.
    pub total: f64,
}

/// Long-run average of a recurring period next to its most recent total.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodComparison {
    /// Always a cyclic key (`03`, `Q1`, `H1`).
    pub period: PeriodKey,
    /// Mean total per year in which this period has observations.
    pub average: f64,
    /// Rainfall in this period within the trailing window.
    pub trailing_total: f64,
}

/// Cumulative rainfall at the end of one day of a year-progress series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyPoint {
    /// `MM-DD`
    pub day_label: String,
    pub cumulative: f64,
}

/// Running rainfall total for one calendar year, one point per day from
/// Jan 1.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunningSeries {
    pub year: i32,
    pub points: Vec<DailyPoint>,
}

impl RunningSeries {
    /// Rainfall accumulated by the last day of the series.
    pub fn final_total(&self) -> f64 {
        self.points.last().map_or(0.0, |point| point.cumulative)
    }
}

/// A run of consecutive days without qualifying rainfall.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DrySpell {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Days from `start` to `end` inclusive.
    pub days: i64,
}

/// Headline counts for a dry-spell report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct DrySpellSummary {
    /// Days from the first rain day through the reference date.
    pub total_days: i64,
    pub rain_days: usize,
    pub dry_days: i64,
    pub spell_count: usize,
}
