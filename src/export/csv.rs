use super::Table;
use crate::Result;
use std::io::Write;

/// Write a table as CSV: a header row of column names, then one line per row.
///
/// Null and missing cells are written as empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns())?;
    for cells in table.rows() {
        csv_writer.write_record(cells.map(|cell| cell.map(ToString::to_string).unwrap_or_default()))?;
    }

    csv_writer.flush()?;
    Ok(())
}
