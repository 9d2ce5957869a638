//! Command implementations for the rainfall CLI.
//!
//! Each subcommand loads the dataset into a [`RecordStore`], builds one
//! report from the current snapshot and writes it to stdout as a table,
//! JSON or CSV.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use log::info;
use rain_core::observation::DEFAULT_DATA_FILE;
use rain_core::{CyclicGranularity, RainfallDataset, RecordStore};
use rain_data::{RunningMode, SortOrder};
use std::path::{Path, PathBuf};

pub mod output;
pub mod report;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Rainfall dataset (JSON keyed by year; `.gz` files are gunzipped)
    #[arg(short = 'd', long, global = true, default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Date treated as "today" (YYYY-MM-DD); defaults to the local date
    #[arg(short = 'r', long, global = true, value_parser = parse_reference)]
    pub reference: Option<NaiveDate>,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    pub fn reference_date(&self) -> NaiveDate {
        self.reference
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

fn parse_reference(s: &str) -> Result<NaiveDate, String> {
    rain_utils::dates::parse_date(s).map_err(|e| e.to_string())
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    /// Chronological / calendar order
    Period,
    /// Driest first
    Ascending,
    /// Wettest first
    Descending,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Period => SortOrder::Period,
            SortArg::Ascending => SortOrder::ValueAscending,
            SortArg::Descending => SortOrder::ValueDescending,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodArg {
    Month,
    Quarter,
    Half,
}

impl From<PeriodArg> for CyclicGranularity {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Month => CyclicGranularity::Month,
            PeriodArg::Quarter => CyclicGranularity::Quarter,
            PeriodArg::Half => CyclicGranularity::Half,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Past years run to Dec 31
    FullYear,
    /// Every year stops at the reference day
    YearToDate,
}

impl From<ModeArg> for RunningMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::FullYear => RunningMode::FullYear,
            ModeArg::YearToDate => RunningMode::YearToDate,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Total rainfall per calendar year
    Yearly {
        #[arg(short, long, value_enum, default_value_t = SortArg::Period)]
        sort: SortArg,
    },

    /// Total rainfall per month (YYYY-MM), driest first by default
    Monthly {
        #[arg(short, long, value_enum, default_value_t = SortArg::Ascending)]
        sort: SortArg,
    },

    /// Total rainfall per quarter (YYYY-Qn), driest first by default
    Quarterly {
        #[arg(short, long, value_enum, default_value_t = SortArg::Ascending)]
        sort: SortArg,
    },

    /// Total rainfall per half-year (YYYY-Hn), driest first by default
    HalfYearly {
        #[arg(short, long, value_enum, default_value_t = SortArg::Ascending)]
        sort: SortArg,
    },

    /// Long-run average of each month, quarter or half against the trailing window
    Compare {
        #[arg(short, long, value_enum, default_value_t = PeriodArg::Month)]
        granularity: PeriodArg,

        /// Trailing window length in periods (defaults to one year's worth)
        #[arg(short, long)]
        window: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = SortArg::Period)]
        sort: SortArg,
    },

    /// Day-by-day cumulative rainfall for every year
    Progress {
        #[arg(short, long, value_enum, default_value_t = ModeArg::FullYear)]
        mode: ModeArg,

        /// Only print this year's series
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Longest runs of days without rain
    DrySpells {
        /// Smallest daily amount (mm) that still counts as a rain day
        #[arg(short, long, default_value_t = 0.0)]
        min_rainfall: f64,

        /// Number of longest spells to list
        #[arg(short = 'n', long, default_value_t = 25)]
        top: usize,

        /// Number of spells from the last 365 days to list
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },
}

/// Read a dataset file and wrap it in a fresh store.
pub async fn load_store(path: &Path) -> anyhow::Result<RecordStore> {
    let dataset = RainfallDataset::load(path).await?;
    Ok(RecordStore::from_dataset(dataset))
}

pub async fn run(options: GlobalOptions, command: Command) -> anyhow::Result<()> {
    let reference = options.reference_date();
    info!(
        "[rain] cmd: {:?} against {} (reference {})",
        command,
        options.data.display(),
        reference
    );
    let store = load_store(&options.data).await?;
    let snapshot = store.current();
    let report = report::build_report(&snapshot, reference, &command);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    output::write_report(&mut handle, &report, options.format)
}
