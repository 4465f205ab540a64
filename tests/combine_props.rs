use std::collections::BTreeSet;

use macro_dash::domain::{CanonicalSeries, RawObservation, TimeWindow};
use macro_dash::series::{combine, normalize};
use proptest::prelude::*;

fn arb_series() -> impl Strategy<Value = Option<CanonicalSeries>> {
    prop::option::weighted(
        0.8,
        prop::collection::btree_map(1990i32..2030, -1.0e6f64..1.0e6, 0..12)
            .prop_map(|m| m.into_iter().collect::<CanonicalSeries>()),
    )
}

fn arb_named() -> impl Strategy<Value = Vec<(String, Option<CanonicalSeries>)>> {
    prop::collection::vec(arb_series(), 0..6)
        .prop_map(|v| v.into_iter().enumerate().map(|(i, s)| (format!("ind{i}"), s)).collect())
}

proptest! {
    #[test]
    fn years_are_strictly_ascending_union(named in arb_named()) {
        let table = combine(named.clone());
        let years = table.years();
        prop_assert!(years.windows(2).all(|w| w[0] < w[1]));

        let expected: BTreeSet<i32> = named
            .iter()
            .filter_map(|(_, s)| s.as_ref())
            .flat_map(|s| s.years().collect::<Vec<_>>())
            .collect();
        prop_assert_eq!(years, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn absent_inputs_are_omitted_and_order_kept(named in arb_named()) {
        let table = combine(named.clone());
        let expected: Vec<&str> = named
            .iter()
            .filter(|(_, s)| s.as_ref().is_some_and(|s| !s.is_empty()))
            .map(|(n, _)| n.as_str())
            .collect();
        prop_assert_eq!(table.column_names().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn combine_is_deterministic(named in arb_named()) {
        prop_assert_eq!(combine(named.clone()), combine(named));
    }

    #[test]
    fn cells_match_inputs(named in arb_named()) {
        let table = combine(named.clone());
        for (name, series) in named.iter().filter_map(|(n, s)| s.as_ref().map(|s| (n, s))) {
            for year in table.years() {
                prop_assert_eq!(table.value(name, year), series.get(year));
            }
        }
    }

    #[test]
    fn normalize_stays_inside_window(
        obs in prop::collection::vec((1980i32..2040, -1.0e3f64..1.0e3), 0..20),
        start in 1990i32..2020,
        len in 0i32..15,
    ) {
        let window = TimeWindow::new(start, start + len);
        let raw = RawObservation::Series(obs.iter().map(|&(y, v)| (y.into(), v)).collect());
        match normalize(&raw, window) {
            Some(series) => {
                prop_assert!(!series.is_empty());
                prop_assert!(series.years().all(|y| window.contains(y)));
            }
            None => prop_assert!(obs.iter().all(|&(y, _)| !window.contains(y))),
        }
    }
}
