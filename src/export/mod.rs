//! Tabular export of flattened document records
//!
//! [`assemble`] lines up records that need not share the same keys: the column set is the union of
//! all keys in first-seen order and rows missing a column get an empty cell. The resulting
//! [`Table`] is then rendered as a single-sheet xlsx workbook by [`serialize`], or as CSV by
//! [`write_csv`].

mod csv;
mod excel;
mod table;

pub use self::csv::write_csv;
pub use excel::{SHEET_NAME, serialize};
pub use table::{Table, assemble};
