//! Sub-annual -> annual aggregation for date-indexed sources.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Reducer, Year};

/// Collapse dated observations into one value per year, ascending by year.
///
/// Input order does not matter: `Last` picks the latest date within each year.
/// For equal dates the later input row wins.
pub fn annualize(observations: &[(NaiveDate, f64)], reducer: Reducer) -> Vec<(Year, f64)> {
    let mut sorted: Vec<(NaiveDate, f64)> = observations
        .iter()
        .copied()
        .filter(|(_, v)| v.is_finite())
        .collect();
    // Stable sort keeps input order among equal dates.
    sorted.sort_by_key(|(d, _)| *d);

    let mut by_year: BTreeMap<Year, Vec<f64>> = BTreeMap::new();
    for (date, value) in sorted {
        by_year.entry(date.year()).or_default().push(value);
    }

    by_year
        .into_iter()
        .filter_map(|(year, values)| {
            let value = match reducer {
                Reducer::Last => *values.last()?,
                Reducer::Mean => values.iter().sum::<f64>() / values.len() as f64,
            };
            Some((year, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn last_and_mean_differ() {
        let obs = vec![(d(2023, 1, 3), 1.0), (d(2023, 12, 29), 3.0)];
        assert_eq!(annualize(&obs, Reducer::Last), vec![(2023, 3.0)]);
        assert_eq!(annualize(&obs, Reducer::Mean), vec![(2023, 2.0)]);
    }

    #[test]
    fn last_uses_date_order_not_input_order() {
        let obs = vec![(d(2023, 12, 29), 3.0), (d(2023, 1, 3), 1.0), (d(2022, 6, 1), 7.0)];
        assert_eq!(annualize(&obs, Reducer::Last), vec![(2022, 7.0), (2023, 3.0)]);
    }

    #[test]
    fn mean_per_year() {
        let obs = vec![
            (d(2021, 1, 1), 1.0),
            (d(2021, 2, 1), 2.0),
            (d(2021, 3, 1), 3.0),
            (d(2022, 1, 1), 10.0),
        ];
        assert_eq!(annualize(&obs, Reducer::Mean), vec![(2021, 2.0), (2022, 10.0)]);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let obs = vec![(d(2021, 1, 1), f64::NAN), (d(2021, 2, 1), 4.0)];
        assert_eq!(annualize(&obs, Reducer::Mean), vec![(2021, 4.0)]);
        assert!(annualize(&[(d(2021, 1, 1), f64::NAN)], Reducer::Last).is_empty());
    }
}
