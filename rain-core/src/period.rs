//! Calendar period keys.
//!
//! Every aggregation buckets observations by a [`PeriodKey`] produced from a
//! date by one of seven [`Granularity`] key functions. Absolute keys
//! (`2024`, `2024-03`, `2024-Q1`, `2024-H1`) name one stretch of time;
//! cyclic keys (`03`, `Q1`, `H1`) recur every year and are used for
//! long-run averages.
//!
//! Labels are zero-padded so that sorting them as strings sorts absolute
//! keys chronologically and cyclic keys in calendar order.

use chrono::{Datelike, NaiveDate};
use rain_utils::dates::first_of_month;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Label of a calendar bucket, tagged with its key family.
///
/// An absolute `"03"` can never be mistaken for the cyclic `"03"`: the two
/// variants never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    Absolute(String),
    Cyclic(String),
}

impl PeriodKey {
    pub fn as_str(&self) -> &str {
        match self {
            PeriodKey::Absolute(label) | PeriodKey::Cyclic(label) => label,
        }
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self, PeriodKey::Cyclic(_))
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str()
            .cmp(other.as_str())
            .then_with(|| self.is_cyclic().cmp(&other.is_cyclic()))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Label for a calendar year, e.g. `2024`.
pub fn year_label(year: i32) -> String {
    format!("{:04}", year)
}

/// The seven date-to-key functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Granularity {
    /// `2024`
    Year,
    /// `03`
    MonthOfYear,
    /// `2024-03`
    YearMonth,
    /// `Q1`
    QuarterOfYear,
    /// `2024-Q1`
    YearQuarter,
    /// `H1`
    HalfOfYear,
    /// `2024-H1`
    YearHalf,
}

impl Granularity {
    pub const ALL: [Granularity; 7] = [
        Granularity::Year,
        Granularity::MonthOfYear,
        Granularity::YearMonth,
        Granularity::QuarterOfYear,
        Granularity::YearQuarter,
        Granularity::HalfOfYear,
        Granularity::YearHalf,
    ];

    /// Map a date to its bucket under this granularity.
    pub fn key(&self, date: &NaiveDate) -> PeriodKey {
        match self {
            Granularity::Year => PeriodKey::Absolute(year_label(date.year())),
            Granularity::MonthOfYear => CyclicGranularity::Month.cyclic_key(date),
            Granularity::YearMonth => CyclicGranularity::Month.absolute_key(date),
            Granularity::QuarterOfYear => CyclicGranularity::Quarter.cyclic_key(date),
            Granularity::YearQuarter => CyclicGranularity::Quarter.absolute_key(date),
            Granularity::HalfOfYear => CyclicGranularity::Half.cyclic_key(date),
            Granularity::YearHalf => CyclicGranularity::Half.absolute_key(date),
        }
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(
            self,
            Granularity::MonthOfYear | Granularity::QuarterOfYear | Granularity::HalfOfYear
        )
    }

    /// The sub-year partition behind this granularity; `None` for whole years.
    pub fn cyclic_granularity(&self) -> Option<CyclicGranularity> {
        match self {
            Granularity::Year => None,
            Granularity::MonthOfYear | Granularity::YearMonth => Some(CyclicGranularity::Month),
            Granularity::QuarterOfYear | Granularity::YearQuarter => {
                Some(CyclicGranularity::Quarter)
            }
            Granularity::HalfOfYear | Granularity::YearHalf => Some(CyclicGranularity::Half),
        }
    }
}

/// A fixed partition of the calendar year into equal runs of months.
///
/// Months, quarters (Jan–Mar, Apr–Jun, Jul–Sep, Oct–Dec) and halves
/// (Jan–Jun, Jul–Dec) differ only in the number of periods per year, so
/// every per-period algorithm is written once against this type.
///
/// Periods are also numbered on a single timeline by their *ordinal*,
/// `year * cycle_length + index`, which makes "N periods back" plain
/// integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CyclicGranularity {
    Month,
    Quarter,
    Half,
}

impl CyclicGranularity {
    /// Periods per calendar year.
    pub fn cycle_length(&self) -> u32 {
        match self {
            CyclicGranularity::Month => 12,
            CyclicGranularity::Quarter => 4,
            CyclicGranularity::Half => 2,
        }
    }

    pub fn months_per_period(&self) -> u32 {
        12 / self.cycle_length()
    }

    /// Zero-based position of the date's period within its year.
    pub fn index(&self, date: &NaiveDate) -> u32 {
        date.month0() / self.months_per_period()
    }

    pub fn cyclic_label(&self, index: u32) -> String {
        match self {
            CyclicGranularity::Month => format!("{:02}", index + 1),
            CyclicGranularity::Quarter => format!("Q{}", index + 1),
            CyclicGranularity::Half => format!("H{}", index + 1),
        }
    }

    pub fn absolute_label(&self, year: i32, index: u32) -> String {
        format!("{}-{}", year_label(year), self.cyclic_label(index))
    }

    pub fn cyclic_key(&self, date: &NaiveDate) -> PeriodKey {
        PeriodKey::Cyclic(self.cyclic_label(self.index(date)))
    }

    pub fn absolute_key(&self, date: &NaiveDate) -> PeriodKey {
        PeriodKey::Absolute(self.absolute_label(date.year(), self.index(date)))
    }

    pub fn ordinal(&self, date: &NaiveDate) -> i64 {
        i64::from(date.year()) * i64::from(self.cycle_length()) + i64::from(self.index(date))
    }

    /// First calendar day of the period with the given ordinal.
    pub fn ordinal_start(&self, ordinal: i64) -> Option<NaiveDate> {
        first_of_month(0, ordinal * i64::from(self.months_per_period()))
    }

    /// Last calendar day of the period with the given ordinal.
    pub fn ordinal_end(&self, ordinal: i64) -> Option<NaiveDate> {
        self.ordinal_start(ordinal + 1)?.pred_opt()
    }
}
