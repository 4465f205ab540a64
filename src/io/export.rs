//! Export a combined table to CSV.
//!
//! Layout: `Year` first, one column per indicator (selection order), one row
//! per year ascending. Missing cells are left empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::CombinedTable;
use crate::error::AppError;

/// Write the table as UTF-8 CSV to any writer.
pub fn write_table_csv<W: Write>(writer: W, table: &CombinedTable) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["Year".to_string()];
    header.extend(table.column_names().map(str::to_string));
    out.write_record(&header)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (year, cells) in table.rows() {
        let mut record = Vec::with_capacity(cells.len() + 1);
        record.push(year.to_string());
        record.extend(cells.iter().map(|c| c.map(format_value).unwrap_or_default()));
        out.write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the table to `path`; `-` means stdout.
pub fn write_table_csv_path(path: &Path, table: &CombinedTable) -> Result<(), AppError> {
    if path == Path::new("-") {
        return write_table_csv(std::io::stdout().lock(), table);
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_table_csv(file, table)
}

/// Shortest round-trip representation; whole numbers keep one decimal.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalSeries;
    use crate::series::combine;

    #[test]
    fn csv_has_year_index_and_empty_cells() {
        let a: CanonicalSeries = [(2020, 1.0), (2022, 3.25)].into_iter().collect();
        let b: CanonicalSeries = [(2021, 2.0)].into_iter().collect();
        let table = combine([("Brent, $", Some(a)), ("CPI", Some(b))]);

        let mut buf = Vec::new();
        write_table_csv(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Year,\"Brent, $\",CPI\n2020,1.0,\n2021,,2.0\n2022,3.25,\n"
        );
    }

    #[test]
    fn empty_table_writes_header_only() {
        let mut buf = Vec::new();
        write_table_csv(&mut buf, &CombinedTable::new()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Year\n");
    }

    #[test]
    fn format_value_examples() {
        assert_eq!(format_value(3.0), "3.0");
        assert_eq!(format_value(-0.5), "-0.5");
        assert_eq!(format_value(81.23), "81.23");
    }
}
