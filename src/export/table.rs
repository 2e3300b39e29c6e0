use crate::flatten::{FlatRecord, Scalar};
use std::collections::HashSet;

/// Flattened records laid out as rows under a shared set of columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<FlatRecord>,
}

/// Collect records into a table.
///
/// The columns are the union of all record keys in first-seen order; rows keep the input order.
#[must_use]
pub fn assemble(records: Vec<FlatRecord>) -> Table {
    let columns = {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for key in records.iter().flat_map(FlatRecord::keys) {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
        columns
    };

    Table { columns, rows: records }
}

impl Table {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows, each yielding one cell per column; `None` marks a key the record lacks.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Option<&Scalar>>> {
        self.rows
            .iter()
            .map(|record| self.columns.iter().map(move |column| record.get(column)))
    }
}
