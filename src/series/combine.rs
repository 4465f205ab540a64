//! Merge named series into one year-aligned table.

use crate::domain::{CanonicalSeries, CombinedTable};

/// Merge `(name, series)` entries in order.
///
/// Absent entries add no column. If every entry is absent the result is an
/// empty table, which callers must render as "no data".
pub fn combine<I, S>(named: I) -> CombinedTable
where
    I: IntoIterator<Item = (S, Option<CanonicalSeries>)>,
    S: Into<String>,
{
    let mut table = CombinedTable::new();
    for (name, series) in named {
        if let Some(series) = series
            && !series.is_empty()
        {
            table.push_column(name, series);
        }
    }
    table
}
