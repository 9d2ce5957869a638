//! Shared utility functions for rainfall crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Format the month and day of a date as "MM-DD", the x-axis label of
    /// year-progress series.
    pub fn day_label(date: &NaiveDate) -> String {
        date.format("%m-%d").to_string()
    }

    /// Gregorian leap year rule.
    pub fn is_leap_year(year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// First day of the given year.
    pub fn year_start(year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, 1, 1)
    }

    /// Last day of the given year.
    pub fn year_end(year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, 12, 31)
    }

    /// Place the month and day of `date` into `year`.
    ///
    /// Feb 29 has no counterpart in a common year, so it lands on Feb 28.
    pub fn clamp_month_day(year: i32, date: &NaiveDate) -> Option<NaiveDate> {
        let day = if date.month() == 2 && date.day() == 29 && !is_leap_year(year) {
            28
        } else {
            date.day()
        };
        NaiveDate::from_ymd_opt(year, date.month(), day)
    }

    /// First day of the month `month0` months after (or, negative, before)
    /// January of `year`.
    pub fn first_of_month(year: i32, month0: i64) -> Option<NaiveDate> {
        let total = i64::from(year) * 12 + month0;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_is_leap_year() {
            assert!(is_leap_year(2024));
            assert!(is_leap_year(2000));
            assert!(!is_leap_year(1900));
            assert!(!is_leap_year(2023));
        }

        #[test]
        fn test_day_label() {
            let date = NaiveDate::from_ymd_opt(2023, 2, 5).unwrap();
            assert_eq!(day_label(&date), "02-05");
        }

        #[test]
        fn test_clamp_month_day() {
            let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(
                clamp_month_day(2023, &leap_day),
                NaiveDate::from_ymd_opt(2023, 2, 28)
            );
            assert_eq!(
                clamp_month_day(2020, &leap_day),
                NaiveDate::from_ymd_opt(2020, 2, 29)
            );
            let july = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
            assert_eq!(
                clamp_month_day(1999, &july),
                NaiveDate::from_ymd_opt(1999, 7, 4)
            );
        }

        #[test]
        fn test_first_of_month() {
            assert_eq!(first_of_month(2024, 0), NaiveDate::from_ymd_opt(2024, 1, 1));
            assert_eq!(first_of_month(2024, 11), NaiveDate::from_ymd_opt(2024, 12, 1));
            assert_eq!(first_of_month(2024, 12), NaiveDate::from_ymd_opt(2025, 1, 1));
            assert_eq!(first_of_month(2024, -1), NaiveDate::from_ymd_opt(2023, 12, 1));
            assert_eq!(first_of_month(2024, -13), NaiveDate::from_ymd_opt(2022, 12, 1));
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert!(parse_date("2023-02-30").is_err());
        }
    }
}

/// Error types
pub mod error {
    use chrono::NaiveDate;
    use std::fmt;

    /// A record the dataset loader refuses to hand to the aggregation engine.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DatasetError {
        /// Rainfall must be a finite, non-negative number of millimetres.
        InvalidAmount { date: NaiveDate, amount: f64 },
    }

    impl fmt::Display for DatasetError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                DatasetError::InvalidAmount { date, amount } => {
                    write!(f, "Dataset error: invalid rainfall {} mm on {}", amount, date)
                }
            }
        }
    }

    impl std::error::Error for DatasetError {}
}
