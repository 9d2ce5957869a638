use crate::models::PeriodTotal;
use log::debug;
use rain_core::{Granularity, Observation, PeriodKey};
use std::collections::BTreeMap;

/// Sum rainfall per period.
///
/// `known_periods` are seeded at zero so that a period with no records
/// (a dry year listed in the dataset, say) still appears. Periods are
/// returned in key order.
pub fn aggregate<I>(
    observations: &[Observation],
    known_periods: I,
    granularity: Granularity,
) -> Vec<PeriodTotal>
where
    I: IntoIterator<Item = PeriodKey>,
{
    let mut totals: BTreeMap<PeriodKey, f64> = known_periods
        .into_iter()
        .map(|period| (period, 0.0))
        .collect();

    for observation in observations {
        *totals.entry(granularity.key(&observation.date)).or_insert(0.0) += observation.amount;
    }

    debug!(
        "[rain] aggregate: {} records into {} {:?} periods",
        observations.len(),
        totals.len(),
        granularity
    );
    totals
        .into_iter()
        .map(|(period, total)| PeriodTotal { period, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use rain_core::period::year_label;

    fn obs(y: i32, m: u32, d: u32, amount: f64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), amount)
    }

    fn sample() -> Vec<Observation> {
        vec![obs(2024, 1, 15, 10.0), obs(2024, 2, 10, 5.0), obs(2023, 1, 20, 3.0)]
    }

    fn known_years(years: &[i32]) -> Vec<PeriodKey> {
        years
            .iter()
            .map(|year| PeriodKey::Absolute(year_label(*year)))
            .collect()
    }

    #[test]
    fn test_yearly_totals() {
        let totals = aggregate(&sample(), known_years(&[2023, 2024]), Granularity::Year);
        assert_eq!(
            totals,
            vec![
                PeriodTotal {
                    period: PeriodKey::Absolute("2023".to_string()),
                    total: 3.0
                },
                PeriodTotal {
                    period: PeriodKey::Absolute("2024".to_string()),
                    total: 15.0
                },
            ]
        );
    }

    #[test]
    fn test_known_period_without_records_is_zero() {
        let totals = aggregate(&sample(), known_years(&[2022, 2023, 2024]), Granularity::Year);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].period.as_str(), "2022");
        assert_eq!(totals[0].total, 0.0);
    }

    #[test]
    fn test_observed_period_outside_known_set_still_counted() {
        let totals = aggregate(&sample(), known_years(&[]), Granularity::YearMonth);
        let labels: Vec<&str> = totals.iter().map(|t| t.period.as_str()).collect();
        assert_eq!(labels, vec!["2023-01", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_cyclic_months_combine_years() {
        let totals = aggregate(&sample(), known_years(&[]), Granularity::MonthOfYear);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].period, PeriodKey::Cyclic("01".to_string()));
        assert_eq!(totals[0].total, 13.0);
        assert_eq!(totals[1].total, 5.0);
    }

    #[test]
    fn test_no_record_dropped_or_double_counted() {
        let observations: Vec<Observation> = (0..400)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(i);
                Observation::new(date, (i % 7) as f64 * 0.5)
            })
            .collect();
        let expected_2023: f64 = observations
            .iter()
            .filter(|o| o.date.year() == 2023)
            .map(|o| o.amount)
            .sum();

        for granularity in [
            Granularity::Year,
            Granularity::YearMonth,
            Granularity::YearQuarter,
            Granularity::YearHalf,
        ] {
            let totals = aggregate(&observations, known_years(&[]), granularity);
            let sum_2023: f64 = totals
                .iter()
                .filter(|t| t.period.as_str().starts_with("2023"))
                .map(|t| t.total)
                .sum();
            assert!(
                (sum_2023 - expected_2023).abs() < 1e-9,
                "{:?}: {} != {}",
                granularity,
                sum_2023,
                expected_2023
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let first = aggregate(&sample(), known_years(&[2023, 2024]), Granularity::YearQuarter);
        let second = aggregate(&sample(), known_years(&[2023, 2024]), Granularity::YearQuarter);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], known_years(&[]), Granularity::Year).is_empty());
        let seeded = aggregate(&[], known_years(&[2020]), Granularity::Year);
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].total, 0.0);
    }
}
