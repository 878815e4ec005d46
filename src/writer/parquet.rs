use std::fs::File;
use std::path::Path;

use arrow2::array::{Array, MutableUtf8Array, Utf8Array};
use arrow2::chunk::Chunk;
use arrow2::datatypes::{DataType, Field, Schema};
use arrow2::io::parquet::write::{
    transverse, Encoding, FileWriter, RowGroupIterator, WriteOptions,
};
use parquet2::compression::CompressionOptions;
use parquet2::write::Version;
use tracing::info;

use super::{ensure_parent_dir, TabularWriter};
use crate::error::PipelineError;
use crate::table::Table;
use crate::value::Scalar;

const WRITE_OPTIONS: WriteOptions = WriteOptions {
    write_statistics: true,
    compression: CompressionOptions::Snappy,
    version: Version::V2,
    data_pagesize_limit: None,
};

/// Every column is nullable Utf8: cells are heterogeneous across documents,
/// so no type is inferred. Blank cells become nulls.
#[derive(Debug, Clone, Default)]
pub struct ParquetWriter;

fn to_chunk(table: &Table) -> Result<(Schema, Chunk<Box<dyn Array>>), arrow2::error::Error> {
    let schema = Schema::from(
        table
            .header()
            .iter()
            .map(|name| Field::new(name.as_str(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );

    let mut columns: Vec<MutableUtf8Array<i32>> = (0..table.column_count())
        .map(|_| MutableUtf8Array::with_capacity(table.row_count()))
        .collect();

    for row in table.rows() {
        for (col, cell) in columns.iter_mut().zip(row) {
            match cell {
                Scalar::Blank => col.push::<&str>(None),
                Scalar::Text(s) => col.push(Some(s.as_str())),
                other => col.push(Some(other.to_string())),
            }
        }
    }

    let arrays: Vec<Box<dyn Array>> = columns
        .into_iter()
        .map(|col| <Utf8Array<i32> as From<MutableUtf8Array<i32>>>::from(col).boxed())
        .collect();
    Ok((schema, Chunk::try_new(arrays)?))
}

fn write_chunk(
    schema: Schema,
    chunk: Chunk<Box<dyn Array>>,
    dest: &Path,
) -> Result<(), arrow2::error::Error> {
    let encodings = schema
        .fields
        .iter()
        .map(|f| transverse(&f.data_type, |_| Encoding::Plain))
        .collect();
    let row_groups =
        RowGroupIterator::try_new(vec![Ok(chunk)].into_iter(), &schema, WRITE_OPTIONS, encodings)?;

    let file = File::create(dest)?;
    let mut writer = FileWriter::try_new(file, schema, WRITE_OPTIONS)?;
    for group in row_groups {
        writer.write(group?)?;
    }
    writer.end(None)?;
    Ok(())
}

impl TabularWriter for ParquetWriter {
    fn write(&self, table: &Table, dest: &Path) -> Result<(), PipelineError> {
        ensure_parent_dir(dest)?;

        let (schema, chunk) = to_chunk(table).map_err(|e| PipelineError::output(dest, e))?;
        write_chunk(schema, chunk, dest).map_err(|e| PipelineError::output(dest, e))?;

        info!(
            path = %dest.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "wrote parquet file"
        );
        Ok(())
    }
}
