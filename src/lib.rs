//! Flatten the JSON documents inside a zip archive into a single table.
//!
//! Each document becomes one or more flat rows (see [`FlattenMode`]); the rows
//! are unified into one header in first-seen column order and written out as a
//! spreadsheet or a Parquet file.

pub mod archive;
pub mod columns;
pub mod config;
pub mod error;
pub mod flattener;
pub mod log;
pub mod parser;
pub mod pipeline;
pub mod table;
pub mod value;
pub mod writer;

pub use crate::columns::ColumnSet;
pub use crate::config::{load_settings, Settings};
pub use crate::error::{ErrorKind, PipelineError};
pub use crate::flattener::{FlatRecord, FlattenMode, Flattener};
pub use crate::pipeline::{process, BadEntryPolicy, EntryOutcome, EntryStatus, Pipeline, ProcessReport};
pub use crate::table::{project_row, Table};
pub use crate::value::{NestedValue, Scalar};
pub use crate::writer::{unique_output_path, OutputFormat, ParquetWriter, TabularWriter, XlsxWriter};
