//! Builds the report behind each subcommand from a snapshot.

use crate::Command;
use chrono::{Days, NaiveDate};
use rain_core::{CyclicGranularity, Granularity, Snapshot};
use rain_data::{
    aggregate, build_running_series_with, compare_to_trailing_window, dry_spells_overlapping,
    find_dry_spells, longest_dry_spells, sort_periods, summarize_dry_spells, trailing_window_bounds,
    DrySpell, DrySpellSummary, PeriodComparison, PeriodTotal, RunningMode, RunningSeries,
    SortOrder, TrailingWindow,
};
use serde::Serialize;

/// Days counted back from the reference date for "recent" dry spells.
pub const RECENT_DAYS: u64 = 365;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Totals {
        title: String,
        rows: Vec<PeriodTotal>,
    },
    Comparison {
        title: String,
        window_periods: u32,
        window_start: Option<NaiveDate>,
        window_end: Option<NaiveDate>,
        rows: Vec<PeriodComparison>,
    },
    Progress {
        reference: NaiveDate,
        series: Vec<RunningSeries>,
    },
    DrySpells {
        min_rainfall: f64,
        summary: DrySpellSummary,
        longest: Vec<DrySpell>,
        recent_from: NaiveDate,
        recent_to: NaiveDate,
        recent: Vec<DrySpell>,
    },
}

pub fn build_report(snapshot: &Snapshot, reference: NaiveDate, command: &Command) -> Report {
    match command {
        Command::Yearly { sort } => totals_report(
            snapshot,
            reference,
            Granularity::Year,
            "Yearly rainfall",
            (*sort).into(),
        ),
        Command::Monthly { sort } => totals_report(
            snapshot,
            reference,
            Granularity::YearMonth,
            "Monthly rainfall",
            (*sort).into(),
        ),
        Command::Quarterly { sort } => totals_report(
            snapshot,
            reference,
            Granularity::YearQuarter,
            "Quarterly rainfall",
            (*sort).into(),
        ),
        Command::HalfYearly { sort } => totals_report(
            snapshot,
            reference,
            Granularity::YearHalf,
            "Half-yearly rainfall",
            (*sort).into(),
        ),
        Command::Compare {
            granularity,
            window,
            sort,
        } => comparison_report(snapshot, reference, (*granularity).into(), *window, (*sort).into()),
        Command::Progress { mode, year } => {
            progress_report(snapshot, reference, (*mode).into(), *year)
        }
        Command::DrySpells {
            min_rainfall,
            top,
            recent,
        } => dry_spell_report(snapshot, reference, *min_rainfall, *top, *recent),
    }
}

/// Totals for every known period of an absolute granularity.
pub fn period_totals(
    snapshot: &Snapshot,
    reference: NaiveDate,
    granularity: Granularity,
    order: SortOrder,
) -> Vec<PeriodTotal> {
    let known = snapshot.known_periods(granularity, reference);
    sort_periods(aggregate(snapshot.observations(), known, granularity), order)
}

fn totals_report(
    snapshot: &Snapshot,
    reference: NaiveDate,
    granularity: Granularity,
    title: &str,
    order: SortOrder,
) -> Report {
    Report::Totals {
        title: title.to_string(),
        rows: period_totals(snapshot, reference, granularity, order),
    }
}

fn comparison_report(
    snapshot: &Snapshot,
    reference: NaiveDate,
    granularity: CyclicGranularity,
    window: Option<u32>,
    order: SortOrder,
) -> Report {
    let window = window
        .map(TrailingWindow::new)
        .unwrap_or_else(|| TrailingWindow::full_cycle(granularity));
    let rows = compare_to_trailing_window(snapshot.observations(), granularity, reference, window);
    let bounds = trailing_window_bounds(granularity, reference, window);
    let noun = match granularity {
        CyclicGranularity::Month => "month",
        CyclicGranularity::Quarter => "quarter",
        CyclicGranularity::Half => "half-year",
    };
    Report::Comparison {
        title: format!("Average rainfall per {} vs. trailing window", noun),
        window_periods: window.periods(),
        window_start: bounds.map(|(start, _)| start),
        window_end: bounds.map(|(_, end)| end),
        rows: sort_periods(rows, order),
    }
}

fn progress_report(
    snapshot: &Snapshot,
    reference: NaiveDate,
    mode: RunningMode,
    year: Option<i32>,
) -> Report {
    let mut series = build_running_series_with(snapshot.observations(), reference, mode);
    if let Some(year) = year {
        series.retain(|s| s.year == year);
    }
    Report::Progress { reference, series }
}

fn dry_spell_report(
    snapshot: &Snapshot,
    reference: NaiveDate,
    min_rainfall: f64,
    top: usize,
    recent: usize,
) -> Report {
    let observations = snapshot.observations();
    let spells = find_dry_spells(observations, min_rainfall, Some(reference));
    let summary = summarize_dry_spells(observations, &spells, min_rainfall, reference);
    let recent_from = reference
        .checked_sub_days(Days::new(RECENT_DAYS))
        .unwrap_or(reference);
    let recent_spells = longest_dry_spells(
        dry_spells_overlapping(&spells, recent_from, reference),
        recent,
    );
    Report::DrySpells {
        min_rainfall,
        summary,
        longest: longest_dry_spells(spells, top),
        recent_from,
        recent_to: reference,
        recent: recent_spells,
    }
}
