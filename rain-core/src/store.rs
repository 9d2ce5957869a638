//! Versioned, immutable record snapshots.
//!
//! Computations borrow one [`Snapshot`] for their whole run. Reloading the
//! dataset builds a fresh snapshot and swaps it into the [`RecordStore`];
//! callers still holding the previous `Arc` keep reading it untouched.

use crate::observation::{Observation, RainfallDataset};
use crate::period::{year_label, Granularity, PeriodKey};
use arc_swap::ArcSwap;
use chrono::{Datelike, NaiveDate};
use log::info;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// A read-only view of the dataset at one version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    version: u64,
    observations: Vec<Observation>,
    known_years: BTreeSet<i32>,
}

impl Snapshot {
    pub fn new(version: u64, observations: Vec<Observation>, known_years: BTreeSet<i32>) -> Self {
        Snapshot {
            version,
            observations,
            known_years,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Years listed in the source file, with or without records.
    pub fn known_years(&self) -> &BTreeSet<i32> {
        &self.known_years
    }

    /// Every period that should appear in a report even without rainfall.
    ///
    /// - `Year`: each known year.
    /// - absolute sub-year keys: each period of each known year up to the
    ///   reference date's period; later periods have not happened yet.
    /// - cyclic keys: the full cycle, as soon as any year is known.
    pub fn known_periods(&self, granularity: Granularity, reference: NaiveDate) -> Vec<PeriodKey> {
        let Some(cyclic) = granularity.cyclic_granularity() else {
            return self
                .known_years
                .iter()
                .map(|year| PeriodKey::Absolute(year_label(*year)))
                .collect();
        };

        if granularity.is_cyclic() {
            if self.known_years.is_empty() {
                return Vec::new();
            }
            return (0..cyclic.cycle_length())
                .map(|index| PeriodKey::Cyclic(cyclic.cyclic_label(index)))
                .collect();
        }

        let reference_year = reference.year();
        let reference_index = cyclic.index(&reference);
        let mut periods = Vec::new();
        for year in self.known_years.range(..=reference_year) {
            let last_index = if *year == reference_year {
                reference_index
            } else {
                cyclic.cycle_length() - 1
            };
            for index in 0..=last_index {
                periods.push(PeriodKey::Absolute(cyclic.absolute_label(*year, index)));
            }
        }
        periods
    }
}

/// Holder of the current snapshot.
///
/// Reads are lock-free. Reloads are serialised so versions increase in
/// the order snapshots become current.
pub struct RecordStore {
    current: ArcSwap<Snapshot>,
    reload: Mutex<()>,
}

impl RecordStore {
    pub fn new(snapshot: Snapshot) -> Self {
        RecordStore {
            current: ArcSwap::from_pointee(snapshot),
            reload: Mutex::new(()),
        }
    }

    /// Start a store at version 1 from a freshly loaded dataset.
    pub fn from_dataset(dataset: RainfallDataset) -> Self {
        Self::new(dataset.into_snapshot(1))
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Install a newly loaded dataset as the next version.
    pub fn replace(&self, dataset: RainfallDataset) -> Arc<Snapshot> {
        let _guard = self
            .reload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let version = self.current.load().version() + 1;
        let snapshot = Arc::new(dataset.into_snapshot(version));
        self.current.store(Arc::clone(&snapshot));
        info!(
            "[rain] store: Snapshot v{} holds {} records",
            version,
            snapshot.observations().len()
        );
        snapshot
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(years: &[i32], observations: Vec<Observation>) -> RainfallDataset {
        RainfallDataset {
            observations,
            known_years: years.iter().copied().collect(),
        }
    }

    fn labels(keys: &[PeriodKey]) -> Vec<&str> {
        keys.iter().map(|k| k.as_str()).collect()
    }

    #[test]
    fn test_known_years_include_dry_years() {
        let snapshot = dataset(&[2022, 2023], vec![]).into_snapshot(1);
        let keys = snapshot.known_periods(Granularity::Year, date(2023, 6, 1));
        assert_eq!(labels(&keys), vec!["2022", "2023"]);
    }

    #[test]
    fn test_known_months_stop_at_reference() {
        let snapshot = dataset(&[2023, 2024, 2025], vec![]).into_snapshot(1);
        let keys = snapshot.known_periods(Granularity::YearMonth, date(2024, 3, 10));
        assert_eq!(keys.len(), 12 + 3);
        assert_eq!(keys.first().map(|k| k.as_str()), Some("2023-01"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("2024-03"));
    }

    #[test]
    fn test_known_halves_and_cyclic() {
        let snapshot = dataset(&[2024], vec![]).into_snapshot(1);
        let halves = snapshot.known_periods(Granularity::YearHalf, date(2024, 8, 1));
        assert_eq!(labels(&halves), vec!["2024-H1", "2024-H2"]);

        let quarters = snapshot.known_periods(Granularity::QuarterOfYear, date(2024, 8, 1));
        assert_eq!(labels(&quarters), vec!["Q1", "Q2", "Q3", "Q4"]);
        assert!(quarters.iter().all(|k| k.is_cyclic()));

        let empty = Snapshot::default();
        assert!(empty
            .known_periods(Granularity::MonthOfYear, date(2024, 8, 1))
            .is_empty());
    }

    #[test]
    fn test_replace_bumps_version_and_keeps_old_snapshot() {
        let store = RecordStore::from_dataset(dataset(
            &[2023],
            vec![Observation::new(date(2023, 1, 1), 1.0)],
        ));
        let before = store.current();
        assert_eq!(before.version(), 1);

        let after = store.replace(dataset(
            &[2023, 2024],
            vec![
                Observation::new(date(2023, 1, 1), 1.0),
                Observation::new(date(2024, 1, 1), 2.0),
            ],
        ));
        assert_eq!(after.version(), 2);
        assert_eq!(store.current().version(), 2);
        // the reader that started earlier still sees its own data
        assert_eq!(before.observations().len(), 1);
        assert_eq!(store.current().observations().len(), 2);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(RecordStore::default());
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.current();
                        // version v was built with exactly v records
                        let expected = snapshot.version() as usize;
                        assert_eq!(snapshot.observations().len(), expected);
                    }
                })
            })
            .collect();

        for n in 1..=50u32 {
            let observations = (0..n)
                .map(|i| Observation::new(date(2020, 1, 1) + chrono::Days::new(u64::from(i)), 1.0))
                .collect();
            store.replace(dataset(&[2020], observations));
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.current().version(), 50);
    }
}
