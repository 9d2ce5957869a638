use crate::store::Snapshot;
use chrono::naive::NaiveDate;
use flate2::read::GzDecoder;
use log::{info, warn};
use rain_utils::{dates::parse_date, error::DatasetError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

/// Default dataset file read by the command line tool.
pub const DEFAULT_DATA_FILE: &str = "rainfall_data.json";

/// One day's rainfall measurement in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub amount: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Observation { date, amount }
    }
}

/// A record as it appears in the dataset file.
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    rainfall_mm: f64,
}

/// The parsed contents of a rainfall dataset file.
///
/// The file is a JSON object keyed by year, each holding that year's
/// records:
///
/// ```text
/// {
///   "2023": [{"date": "2023-01-20", "rainfall_mm": 3.0}],
///   "2024": []
/// }
/// ```
///
/// Every key that parses as a year is a *known year*, including years whose
/// array is empty or null; those still show up as zero-rainfall periods in
/// the reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RainfallDataset {
    pub observations: Vec<Observation>,
    pub known_years: BTreeSet<i32>,
}

impl RainfallDataset {
    /// Parse a dataset from its JSON text.
    pub fn from_json_str(json: &str) -> anyhow::Result<RainfallDataset> {
        let raw: BTreeMap<String, Option<Vec<RawRecord>>> = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("Failed to parse rainfall JSON: {}", e))?;
        Self::from_raw(raw)
    }

    /// Parse a dataset from any reader yielding JSON bytes.
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<RainfallDataset> {
        let raw: BTreeMap<String, Option<Vec<RawRecord>>> = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("Failed to parse rainfall JSON: {}", e))?;
        Self::from_raw(raw)
    }

    /// Read a dataset file; files ending in `.gz` are gunzipped first.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<RainfallDataset> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let is_gzip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let dataset = if is_gzip {
            Self::from_reader(GzDecoder::new(bytes.as_slice()))?
        } else {
            Self::from_reader(bytes.as_slice())?
        };
        info!(
            "[rain] loader: Loaded {} records across {} years from {}",
            dataset.observations.len(),
            dataset.known_years.len(),
            path.display()
        );
        Ok(dataset)
    }

    fn from_raw(raw: BTreeMap<String, Option<Vec<RawRecord>>>) -> anyhow::Result<RainfallDataset> {
        let mut observations = Vec::new();
        let mut known_years = BTreeSet::new();
        let mut skipped = 0u32;

        for (year_key, records) in raw {
            match year_key.trim().parse::<i32>() {
                Ok(year) => {
                    known_years.insert(year);
                }
                Err(_) => warn!("[rain] loader: Ignoring non-year key {:?}", year_key),
            }
            for record in records.unwrap_or_default() {
                let date = match parse_date(&record.date) {
                    Ok(date) => date,
                    Err(e) => {
                        warn!("[rain] loader: Could not parse date {}: {}", record.date, e);
                        skipped += 1;
                        continue;
                    }
                };
                if !record.rainfall_mm.is_finite() || record.rainfall_mm < 0.0 {
                    return Err(DatasetError::InvalidAmount {
                        date,
                        amount: record.rainfall_mm,
                    }
                    .into());
                }
                observations.push(Observation::new(date, record.rainfall_mm));
            }
        }

        if skipped > 0 {
            warn!("[rain] loader: Skipped {} records with bad dates", skipped);
        }
        observations.sort_by_key(|obs| obs.date);
        Ok(RainfallDataset {
            observations,
            known_years,
        })
    }

    /// Freeze the dataset into a read-only snapshot.
    pub fn into_snapshot(self, version: u64) -> Snapshot {
        Snapshot::new(version, self.observations, self.known_years)
    }
}
