//! Day-by-day cumulative rainfall per calendar year.
//!
//! Two end-of-series policies exist (see [`RunningMode`]). The default,
//! `FullYear`, runs completed years to Dec 31. `YearToDate` stops every year
//! at the reference month and day; with a reference of 2024-02-29 that
//! makes the 2023 series end at `02-28`.

use crate::models::{DailyPoint, RunningSeries};
use chrono::{Datelike, NaiveDate};
use log::debug;
use rain_core::date_range::DayRange;
use rain_core::Observation;
use rain_utils::dates::{clamp_month_day, day_label, year_end, year_start};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Where each year's running series stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunningMode {
    /// Years before the reference year run to Dec 31; the reference year
    /// (and any later year) stops at the reference month and day.
    #[default]
    FullYear,
    /// Every year stops at the reference month and day, so each series
    /// is a year-to-date figure comparable with the current year.
    YearToDate,
}

/// Day-by-day cumulative rainfall for every year with observations, in
/// [`RunningMode::FullYear`] mode. Use [`build_running_series_with`] and
/// [`RunningMode::YearToDate`] for series that all stop at the reference day.
pub fn build_running_series(
    observations: &[Observation],
    reference: NaiveDate,
) -> Vec<RunningSeries> {
    build_running_series_with(observations, reference, RunningMode::FullYear)
}

/// As [`build_running_series`], with an explicit end-of-series policy.
///
/// Series come back in ascending year order. Days without a record add
/// nothing; several records on one day are summed.
pub fn build_running_series_with(
    observations: &[Observation],
    reference: NaiveDate,
    mode: RunningMode,
) -> Vec<RunningSeries> {
    let mut by_year: BTreeMap<i32, HashMap<NaiveDate, f64>> = BTreeMap::new();
    for observation in observations {
        *by_year
            .entry(observation.date.year())
            .or_default()
            .entry(observation.date)
            .or_insert(0.0) += observation.amount;
    }

    let series: Vec<RunningSeries> = by_year
        .into_iter()
        .filter_map(|(year, rain_by_day)| {
            let start = year_start(year)?;
            let end = series_end(year, reference, mode)?;
            let mut cumulative = 0.0;
            let points = DayRange::new(start, end)
                .map(|day| {
                    cumulative += rain_by_day.get(&day).copied().unwrap_or(0.0);
                    DailyPoint {
                        day_label: day_label(&day),
                        cumulative,
                    }
                })
                .collect();
            Some(RunningSeries { year, points })
        })
        .collect();

    debug!(
        "[rain] running: {} series up to {} ({:?})",
        series.len(),
        reference,
        mode
    );
    series
}

/// Last day of `year`'s series.
///
/// When the series stops at the reference month and day and the reference
/// is Feb 29, common years stop at Feb 28.
pub fn series_end(year: i32, reference: NaiveDate, mode: RunningMode) -> Option<NaiveDate> {
    match mode {
        RunningMode::FullYear if year < reference.year() => year_end(year),
        _ => clamp_month_day(year, &reference),
    }
}
