use crate::models::{PeriodComparison, PeriodTotal};
use rain_core::PeriodKey;
use serde::Serialize;

/// How a report orders its rows. Chosen per view by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    /// By period label: chronological for absolute keys, calendar order for
    /// cyclic keys.
    #[default]
    Period,
    /// Driest first.
    ValueAscending,
    /// Wettest first.
    ValueDescending,
}

/// A row that can be ranked by its period and a single rainfall figure.
pub trait Ranked {
    fn period(&self) -> &PeriodKey;
    fn value(&self) -> f64;
}

impl Ranked for PeriodTotal {
    fn period(&self) -> &PeriodKey {
        &self.period
    }
    fn value(&self) -> f64 {
        self.total
    }
}

impl Ranked for PeriodComparison {
    fn period(&self) -> &PeriodKey {
        &self.period
    }
    fn value(&self) -> f64 {
        self.average
    }
}

/// Reorder rows. Equal values fall back to period order, so the result is
/// fully determined by the rows and not by their incoming order.
pub fn sort_periods<T: Ranked>(mut items: Vec<T>, order: SortOrder) -> Vec<T> {
    match order {
        SortOrder::Period => items.sort_by(|a, b| a.period().cmp(b.period())),
        SortOrder::ValueAscending => items.sort_by(|a, b| {
            a.value()
                .total_cmp(&b.value())
                .then_with(|| a.period().cmp(b.period()))
        }),
        SortOrder::ValueDescending => items.sort_by(|a, b| {
            b.value()
                .total_cmp(&a.value())
                .then_with(|| a.period().cmp(b.period()))
        }),
    }
    items
}
