//! Recent rainfall against the long-run norm, per recurring period.
//!
//! For every month (or quarter, or half-year) seen in the data this
//! produces two figures:
//!
//! - the historical average: total rainfall ever recorded in that period
//!   divided by the number of distinct years it was recorded in;
//! - the trailing total: rainfall in that period within the last `W`
//!   whole periods, counting back from and including the period that holds
//!   the reference date.
//!
//! The window is aligned to period boundaries. With monthly granularity,
//! `W = 12` and a reference of 2024-03-01 it covers 2023-04-01 through
//! 2024-03-31. Periods are numbered on one timeline
//! (see [`CyclicGranularity::ordinal`]), so the reference period is simply
//! one of the `W` ordinals in the window and is never counted twice.

use crate::models::PeriodComparison;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rain_core::{CyclicGranularity, Observation, PeriodKey};
use std::collections::{BTreeMap, BTreeSet};

/// Number of whole periods, ending with the reference period, that make up
/// the trailing window. Never less than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow(u32);

impl TrailingWindow {
    pub fn new(periods: u32) -> Self {
        TrailingWindow(periods.max(1))
    }

    /// One calendar year's worth of periods: 12 months, 4 quarters or 2 halves.
    pub fn full_cycle(granularity: CyclicGranularity) -> Self {
        TrailingWindow(granularity.cycle_length())
    }

    pub fn periods(&self) -> u32 {
        self.0
    }

    /// Inclusive range of period ordinals covered when the window ends at
    /// `reference`.
    fn ordinals(&self, granularity: CyclicGranularity, reference: &NaiveDate) -> (i64, i64) {
        let last = granularity.ordinal(reference);
        (last - i64::from(self.0) + 1, last)
    }
}

/// Historical average vs. the last full year of periods.
pub fn compare_to_trailing(
    observations: &[Observation],
    granularity: CyclicGranularity,
    reference: NaiveDate,
) -> Vec<PeriodComparison> {
    compare_to_trailing_window(
        observations,
        granularity,
        reference,
        TrailingWindow::full_cycle(granularity),
    )
}

#[derive(Default)]
struct CyclicAccumulator {
    total: f64,
    years: BTreeSet<i32>,
    trailing_total: f64,
}

/// Historical average vs. a trailing window of any length.
///
/// One comparison per cyclic key that has at least one observation, in
/// calendar order. Records after the reference period never count towards
/// the trailing total.
pub fn compare_to_trailing_window(
    observations: &[Observation],
    granularity: CyclicGranularity,
    reference: NaiveDate,
    window: TrailingWindow,
) -> Vec<PeriodComparison> {
    let (first, last) = window.ordinals(granularity, &reference);
    let mut by_index: BTreeMap<u32, CyclicAccumulator> = BTreeMap::new();

    for observation in observations {
        let accumulator = by_index
            .entry(granularity.index(&observation.date))
            .or_default();
        accumulator.total += observation.amount;
        accumulator.years.insert(observation.date.year());
        if (first..=last).contains(&granularity.ordinal(&observation.date)) {
            accumulator.trailing_total += observation.amount;
        }
    }

    debug!(
        "[rain] trailing: {:?} window of {} periods ending {} over {} records",
        granularity,
        window.periods(),
        reference,
        observations.len()
    );
    by_index
        .into_iter()
        .map(|(index, accumulator)| PeriodComparison {
            period: PeriodKey::Cyclic(granularity.cyclic_label(index)),
            average: average_over_years(accumulator.total, accumulator.years.len()),
            trailing_total: accumulator.trailing_total,
        })
        .collect()
}

/// Mean per year; zero years means no data, reported as 0.
pub fn average_over_years(total: f64, years: usize) -> f64 {
    if years == 0 {
        0.0
    } else {
        total / years as f64
    }
}

/// First and last calendar day covered by the window ending at `reference`.
pub fn trailing_window_bounds(
    granularity: CyclicGranularity,
    reference: NaiveDate,
    window: TrailingWindow,
) -> Option<(NaiveDate, NaiveDate)> {
    let (first, last) = window.ordinals(granularity, &reference);
    Some((
        granularity.ordinal_start(first)?,
        granularity.ordinal_end(last)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(y: i32, m: u32, d: u32, amount: f64) -> Observation {
        Observation::new(date(y, m, d), amount)
    }

    fn sample() -> Vec<Observation> {
        vec![obs(2024, 1, 15, 10.0), obs(2024, 2, 10, 5.0), obs(2023, 1, 20, 3.0)]
    }

    fn find<'a>(comparisons: &'a [PeriodComparison], label: &str) -> &'a PeriodComparison {
        comparisons
            .iter()
            .find(|c| c.period.as_str() == label)
            .unwrap()
    }

    #[test]
    fn test_monthly_average_over_observed_years() {
        let comparisons =
            compare_to_trailing(&sample(), CyclicGranularity::Month, date(2024, 3, 1));
        assert_eq!(comparisons.len(), 2);
        let january = find(&comparisons, "01");
        assert!(january.period.is_cyclic());
        assert_eq!(january.average, 6.5);
        assert_eq!(find(&comparisons, "02").average, 5.0);
    }

    #[test]
    fn test_monthly_window_is_twelve_whole_months() {
        // window for 2024-03-01 is 2023-04 ..= 2024-03, so January 2023 is out
        let comparisons =
            compare_to_trailing(&sample(), CyclicGranularity::Month, date(2024, 3, 1));
        assert_eq!(find(&comparisons, "01").trailing_total, 10.0);
        assert_eq!(find(&comparisons, "02").trailing_total, 5.0);

        let bounds = trailing_window_bounds(
            CyclicGranularity::Month,
            date(2024, 3, 1),
            TrailingWindow::full_cycle(CyclicGranularity::Month),
        );
        assert_eq!(bounds, Some((date(2023, 4, 1), date(2024, 3, 31))));
    }

    #[test]
    fn test_longer_window_reaches_previous_year() {
        let comparisons = compare_to_trailing_window(
            &sample(),
            CyclicGranularity::Month,
            date(2024, 3, 1),
            TrailingWindow::new(15),
        );
        assert_eq!(find(&comparisons, "01").trailing_total, 13.0);
    }

    #[test]
    fn test_reference_period_counted_once() {
        let observations = vec![
            obs(2024, 3, 1, 2.0),
            obs(2024, 3, 20, 4.0),
            obs(2023, 3, 15, 8.0),
        ];
        let comparisons =
            compare_to_trailing(&observations, CyclicGranularity::Month, date(2024, 3, 5));
        let march = find(&comparisons, "03");
        // all of March 2024 is in, March 2023 is thirteen months back
        assert_eq!(march.trailing_total, 6.0);
        assert_eq!(march.average, 7.0);
    }

    #[test]
    fn test_records_after_reference_excluded() {
        let observations = vec![obs(2024, 4, 2, 9.0), obs(2024, 3, 2, 1.0)];
        let comparisons =
            compare_to_trailing(&observations, CyclicGranularity::Month, date(2024, 3, 31));
        assert_eq!(find(&comparisons, "04").trailing_total, 0.0);
        assert_eq!(find(&comparisons, "04").average, 9.0);
        assert_eq!(find(&comparisons, "03").trailing_total, 1.0);
    }

    #[test]
    fn test_quarterly_window() {
        let observations = vec![
            obs(2023, 6, 30, 1.0),  // 2023-Q2, outside
            obs(2023, 7, 1, 2.0),   // 2023-Q3
            obs(2023, 12, 31, 3.0), // 2023-Q4
            obs(2024, 2, 1, 4.0),   // 2024-Q1
            obs(2024, 5, 10, 5.0),  // 2024-Q2, reference quarter
        ];
        let comparisons =
            compare_to_trailing(&observations, CyclicGranularity::Quarter, date(2024, 5, 10));
        let labels: Vec<&str> = comparisons.iter().map(|c| c.period.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(find(&comparisons, "Q2").trailing_total, 5.0);
        assert_eq!(find(&comparisons, "Q2").average, 3.0);
        assert_eq!(find(&comparisons, "Q3").trailing_total, 2.0);
        assert_eq!(find(&comparisons, "Q4").trailing_total, 3.0);
        assert_eq!(find(&comparisons, "Q1").trailing_total, 4.0);
    }

    #[test]
    fn test_half_year_window() {
        let observations = vec![
            obs(2023, 3, 1, 1.0),
            obs(2023, 9, 1, 2.0),
            obs(2024, 1, 10, 4.0),
            obs(2022, 8, 1, 6.0),
        ];
        let comparisons =
            compare_to_trailing(&observations, CyclicGranularity::Half, date(2024, 2, 1));
        let h1 = find(&comparisons, "H1");
        let h2 = find(&comparisons, "H2");
        assert_eq!(h1.trailing_total, 4.0);
        assert_eq!(h1.average, 2.5);
        assert_eq!(h2.trailing_total, 2.0);
        assert_eq!(h2.average, 4.0);
    }

    #[test]
    fn test_zero_window_means_reference_period_only() {
        assert_eq!(TrailingWindow::new(0).periods(), 1);
        let comparisons = compare_to_trailing_window(
            &sample(),
            CyclicGranularity::Month,
            date(2024, 2, 29),
            TrailingWindow::new(0),
        );
        assert_eq!(find(&comparisons, "01").trailing_total, 0.0);
        assert_eq!(find(&comparisons, "02").trailing_total, 5.0);
    }

    #[test]
    fn test_no_data() {
        assert!(compare_to_trailing(&[], CyclicGranularity::Quarter, date(2024, 1, 1)).is_empty());
        assert_eq!(average_over_years(12.0, 0), 0.0);
        assert_eq!(average_over_years(12.0, 4), 3.0);
    }
}
