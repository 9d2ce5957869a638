//! Stretches of days without rain.
//!
//! A rain day is any date with a record of at least `min_rainfall` mm.
//! The days strictly between two consecutive rain days form a dry spell.
//! When a reference date lies after the last rain day, the days from the
//! one after the last rain through the reference date form an open spell.
//! Records dated after the reference date are ignored.

use crate::models::{DrySpell, DrySpellSummary};
use chrono::NaiveDate;
use log::debug;
use rain_core::Observation;
use std::collections::BTreeSet;

impl DrySpell {
    /// The spell strictly between two rain days, if they are not adjacent.
    pub fn between(previous_rain: NaiveDate, next_rain: NaiveDate) -> Option<DrySpell> {
        let days = (next_rain - previous_rain).num_days() - 1;
        if days <= 0 {
            return None;
        }
        Some(DrySpell {
            start: previous_rain.succ_opt()?,
            end: next_rain.pred_opt()?,
            days,
        })
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start <= to && self.end >= from
    }
}

fn rain_days(
    observations: &[Observation],
    min_rainfall: f64,
    reference: Option<NaiveDate>,
) -> BTreeSet<NaiveDate> {
    observations
        .iter()
        .filter(|observation| observation.amount >= min_rainfall)
        .filter(|observation| reference.map_or(true, |reference| observation.date <= reference))
        .map(|observation| observation.date)
        .collect()
}

/// Every dry spell in chronological order.
pub fn find_dry_spells(
    observations: &[Observation],
    min_rainfall: f64,
    reference: Option<NaiveDate>,
) -> Vec<DrySpell> {
    let rain_days = rain_days(observations, min_rainfall, reference);
    let mut spells: Vec<DrySpell> = rain_days
        .iter()
        .zip(rain_days.iter().skip(1))
        .filter_map(|(previous, next)| DrySpell::between(*previous, *next))
        .collect();

    if let (Some(last_rain), Some(reference)) = (rain_days.last(), reference) {
        if reference > *last_rain {
            if let Some(start) = last_rain.succ_opt() {
                spells.push(DrySpell {
                    start,
                    end: reference,
                    days: (reference - *last_rain).num_days(),
                });
            }
        }
    }

    debug!(
        "[rain] dry_spell: {} spells between {} rain days (>= {} mm)",
        spells.len(),
        rain_days.len(),
        min_rainfall
    );
    spells
}

/// The `n` longest spells; equally long spells keep chronological order.
pub fn longest_dry_spells(mut spells: Vec<DrySpell>, n: usize) -> Vec<DrySpell> {
    spells.sort_by(|a, b| b.days.cmp(&a.days).then_with(|| a.start.cmp(&b.start)));
    spells.truncate(n);
    spells
}

/// Spells that touch the inclusive range `from..=to`.
pub fn dry_spells_overlapping(spells: &[DrySpell], from: NaiveDate, to: NaiveDate) -> Vec<DrySpell> {
    spells
        .iter()
        .filter(|spell| spell.overlaps(from, to))
        .copied()
        .collect()
}

pub fn summarize_dry_spells(
    observations: &[Observation],
    spells: &[DrySpell],
    min_rainfall: f64,
    reference: NaiveDate,
) -> DrySpellSummary {
    let rain_days = rain_days(observations, min_rainfall, Some(reference));
    let Some(first_rain) = rain_days.first() else {
        return DrySpellSummary::default();
    };
    DrySpellSummary {
        total_days: ((reference - *first_rain).num_days() + 1).max(0),
        rain_days: rain_days.len(),
        dry_days: spells.iter().map(|spell| spell.days).sum(),
        spell_count: spells.len(),
    }
}
