//! Table sinks.
//!
//! The flattening core only produces a [`Table`]; these writers turn it into a
//! file on disk. Spreadsheets are the primary output, Parquet is there for
//! loading the same rows into analytics tooling.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rand::Rng;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::table::Table;

mod parquet;
mod xlsx;

pub use self::parquet::ParquetWriter;
pub use self::xlsx::{XlsxWriter, DEFAULT_SHEET_NAME};

pub trait TabularWriter {
    fn write(&self, table: &Table, dest: &Path) -> Result<(), PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Parquet => "parquet",
        }
    }

    pub fn writer(self, sheet_name: &str) -> Box<dyn TabularWriter + Send> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxWriter::new(sheet_name)),
            OutputFormat::Parquet => Box::new(ParquetWriter::default()),
        }
    }
}

/// `<dir>/<stem>-<random hex id>.<ext>`, so concurrent runs never share a file.
pub fn unique_output_path(dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    let id: u64 = rand::rng().random();
    dir.join(format!("{stem}-{id:016x}.{}", format.extension()))
}

pub(crate) fn ensure_parent_dir(dest: &Path) -> Result<(), PipelineError> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| PipelineError::output(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_are_unique_per_call() {
        let dir = Path::new("processed");
        let a = unique_output_path(dir, "orders", OutputFormat::Xlsx);
        let b = unique_output_path(dir, "orders", OutputFormat::Xlsx);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("xlsx"));
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("orders-"));
        assert_eq!(name.len(), "orders-".len() + 16 + ".xlsx".len());
    }

    #[test]
    fn parquet_extension() {
        let path = unique_output_path(Path::new("out"), "x", OutputFormat::Parquet);
        assert!(path.to_string_lossy().ends_with(".parquet"));
    }
}
