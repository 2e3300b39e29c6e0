use super::Table;
use crate::Result;
use crate::flatten::Scalar;
use ohno::bail;
use rust_xlsxwriter::{DocProperties, Format, Workbook, Worksheet};

const LOG_TARGET: &str = "     excel";

/// Name of the single sheet in the exported workbook.
pub const SHEET_NAME: &str = "Documents";

/// Largest number of columns an xlsx worksheet can hold.
const MAX_COLUMNS: usize = 16_384;

/// Largest number of rows an xlsx worksheet can hold, header included.
const MAX_ROWS: usize = 1_048_576;

/// Largest number of characters an xlsx cell can hold.
const MAX_CELL_CHARS: usize = 32_767;

/// Serialize a table into the bytes of a single-sheet xlsx workbook.
///
/// The first row holds the column names. Null and missing cells are left empty. Text longer
/// than a cell can hold is truncated with a warning.
#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn serialize(table: &Table) -> Result<Vec<u8>> {
    if table.columns().len() > MAX_COLUMNS {
        bail!("cannot export {} columns, a worksheet holds at most {MAX_COLUMNS}", table.columns().len());
    }
    if table.row_count() >= MAX_ROWS {
        bail!("cannot export {} documents, a worksheet holds at most {}", table.row_count(), MAX_ROWS - 1);
    }

    let mut workbook = Workbook::new();
    let properties = DocProperties::new().set_author("get-documents");
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;
    let header_format = Format::new().set_bold();

    for (col, name) in (0u16..).zip(table.columns()) {
        worksheet.write_string_with_format(0, col, fit_cell(name, name, 0), &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row, cells) in (1u32..).zip(table.rows()) {
        for ((col, name), cell) in (0u16..).zip(table.columns()).zip(cells) {
            if let Some(value) = cell {
                write_scalar(worksheet, row, col, name, value)?;
            }
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_scalar(worksheet: &mut Worksheet, row: u32, col: u16, column: &str, value: &Scalar) -> Result<()> {
    match value {
        Scalar::Null => {}
        Scalar::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Scalar::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, fit_cell(&n.to_string(), column, row))?;
            }
        },
        Scalar::String(s) => {
            worksheet.write_string(row, col, fit_cell(s, column, row))?;
        }
    }
    Ok(())
}

/// Cut `text` to the longest prefix a cell can hold, on a character boundary.
fn fit_cell<'a>(text: &'a str, column: &str, row: u32) -> &'a str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            log::warn!(
                target: LOG_TARGET,
                "Truncating column '{column}' in row {row} to {MAX_CELL_CHARS} characters, the xlsx cell limit"
            );
            text.split_at(end).0
        }
        None => text,
    }
}
