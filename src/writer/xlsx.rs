use std::path::Path;

use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet, XlsxError};
use serde_json::Number;
use tracing::info;

use super::{ensure_parent_dir, TabularWriter};
use crate::error::PipelineError;
use crate::table::Table;
use crate::value::Scalar;

pub const DEFAULT_SHEET_NAME: &str = "Data";

/// Single-sheet workbook: bold header row, one row per table row.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl XlsxWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    fn fill(&self, sheet: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
        sheet.set_name(&self.sheet_name)?;

        let bold = Format::new().set_bold();
        for (col, name) in table.header().iter().enumerate() {
            sheet.write_string_with_format(0, column(col)?, name, &bold)?;
        }

        for (i, cells) in table.rows().iter().enumerate() {
            let row = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col, cell) in cells.iter().enumerate() {
                let col = column(col)?;
                match cell {
                    Scalar::Blank => {}
                    // An empty string cell is dropped on write; a formula keeps it.
                    Scalar::Text(s) if s.is_empty() => {
                        sheet.write_formula(row, col, Formula::new("=\"\"").set_result(""))?;
                    }
                    Scalar::Text(s) => {
                        sheet.write_string(row, col, s)?;
                    }
                    Scalar::Bool(b) => {
                        sheet.write_boolean(row, col, *b)?;
                    }
                    Scalar::Number(n) => match exact_f64(n) {
                        Some(v) => {
                            sheet.write_number(row, col, v)?;
                        }
                        None => {
                            sheet.write_string(row, col, n.to_string())?;
                        }
                    },
                }
            }
        }
        Ok(())
    }
}

/// `None` when the value would lose precision as an Excel number.
fn exact_f64(n: &Number) -> Option<f64> {
    const MAX_EXACT: u64 = 1 << 53;
    if let Some(i) = n.as_i64() {
        (i.unsigned_abs() <= MAX_EXACT).then_some(i as f64)
    } else if let Some(u) = n.as_u64() {
        (u <= MAX_EXACT).then_some(u as f64)
    } else {
        n.as_f64()
    }
}

fn column(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

impl TabularWriter for XlsxWriter {
    fn write(&self, table: &Table, dest: &Path) -> Result<(), PipelineError> {
        ensure_parent_dir(dest)?;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        self.fill(sheet, table)
            .map_err(|e| PipelineError::output(dest, e))?;
        workbook
            .save(dest)
            .map_err(|e| PipelineError::output(dest, e))?;

        info!(
            path = %dest.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "wrote workbook"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Number {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn small_numbers_stay_numeric() {
        assert_eq!(exact_f64(&number("42")), Some(42.0));
        assert_eq!(exact_f64(&number("-7")), Some(-7.0));
        assert_eq!(exact_f64(&number("2.5")), Some(2.5));
        assert_eq!(exact_f64(&number("9007199254740992")), Some(9007199254740992.0));
    }

    #[test]
    fn long_integers_fall_back_to_text() {
        assert_eq!(exact_f64(&number("9007199254740993")), None);
        assert_eq!(exact_f64(&number("-9007199254740993")), None);
        assert_eq!(exact_f64(&number("18446744073709551615")), None);
    }
}
