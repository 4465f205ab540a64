//! Formatted terminal output for dashboard views.
//!
//! We keep formatting code in one place so output changes stay localized.

use crate::app::pipeline::DashboardView;
use crate::domain::{CombinedTable, TimeWindow};

pub const NO_SELECTION_MESSAGE: &str = "Select at least one indicator.";
pub const NO_DATA_MESSAGE: &str = "No data returned. Check dataset or years.";

/// Plain-text table: year column + one right-aligned column per indicator.
pub fn format_table(table: &CombinedTable, precision: usize) -> String {
    let names: Vec<&str> = table.column_names().collect();
    let rows = table.rows();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|(_, values)| {
            values
                .iter()
                .map(|v| v.map(|x| format!("{x:.precision$}")).unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();

    let year_width = "Year".len().max(rows.iter().map(|(y, _)| y.to_string().len()).max().unwrap_or(0));
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let data = cells.iter().map(|r| r[i].chars().count()).max().unwrap_or(0);
            name.chars().count().max(data)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{:<year_width$}", "Year"));
    for (name, w) in names.iter().zip(&widths) {
        out.push_str(&format!("  {name:>w$}"));
    }
    out.push('\n');

    let rule_len = year_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for ((year, _), row) in rows.iter().zip(&cells) {
        out.push_str(&format!("{year:<year_width$}"));
        for (cell, w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {cell:>w$}"));
        }
        out.push('\n');
    }

    out
}

/// Summary line + table (or the informational / warning message).
pub fn format_view(view: &DashboardView, window: TimeWindow, precision: usize) -> String {
    match view {
        DashboardView::NoSelection => format!("{NO_SELECTION_MESSAGE}\n"),
        DashboardView::NoData => format!("Warning: {NO_DATA_MESSAGE}\n"),
        DashboardView::Table(table) => {
            let years = table.years();
            let mut out = format!(
                "=== mdash - {} indicator(s), {window} ({} year(s) with data) ===\n",
                table.columns().len(),
                years.len()
            );
            out.push_str(&format_table(table, precision));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalSeries;
    use crate::series::combine;

    fn sample() -> CombinedTable {
        let a: CanonicalSeries = [(2020, 1.0), (2022, 3.0)].into_iter().collect();
        let b: CanonicalSeries = [(2021, 2.5)].into_iter().collect();
        combine([("A", Some(a)), ("Beta", Some(b))])
    }

    #[test]
    fn table_aligns_columns_and_marks_gaps() {
        let text = format_table(&sample(), 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Year     A  Beta");
        assert_eq!(lines[1], "----------------");
        assert_eq!(lines[2], "2020  1.00     -");
        assert_eq!(lines[3], "2021     -  2.50");
        assert_eq!(lines[4], "2022  3.00     -");
    }

    #[test]
    fn view_messages_differ_for_no_selection_and_no_data() {
        let w = TimeWindow::new(2015, 2025);
        assert_eq!(format_view(&DashboardView::NoSelection, w, 2), format!("{NO_SELECTION_MESSAGE}\n"));
        assert!(format_view(&DashboardView::NoData, w, 2).starts_with("Warning:"));
        let text = format_view(&DashboardView::Table(sample()), w, 2);
        assert!(text.starts_with("=== mdash - 2 indicator(s), 2015-2025 (3 year(s) with data) ==="));
    }
}
