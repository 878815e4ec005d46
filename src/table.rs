use crate::columns::ColumnSet;
use crate::flattener::FlatRecord;
use crate::value::Scalar;

/// Position `i` holds the record's value for `header[i]`, or a blank.
pub fn project_row(header: &[String], record: &FlatRecord) -> Vec<Scalar> {
    header
        .iter()
        .map(|column| record.get(column).cloned().unwrap_or_default())
        .collect()
}

/// Rectangular result: every row is exactly as long as the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl Table {
    /// Union the records' keys into a header, then project every record onto it.
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let header = ColumnSet::unify(records).into_header();
        let rows = records.iter().map(|r| project_row(&header, r)).collect();
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    /// Cell lookup by row number and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Scalar> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }
}
