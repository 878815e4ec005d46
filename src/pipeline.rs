use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::archive::{ArchiveReader, EntryFilter};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::flattener::{FlatRecord, FlattenMode, Flattener, DEFAULT_SEPARATOR};
use crate::parser;
use crate::table::Table;

/// What to do with an entry that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadEntryPolicy {
    /// Fail the whole archive.
    #[default]
    Abort,
    /// Record the failure and keep going.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Flattened { records: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub table: Table,
    pub entries: Vec<EntryOutcome>,
}

impl ProcessReport {
    pub fn skipped(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Skipped { .. }))
    }
}

/// Archive bytes in, table out. Holds everything in memory.
#[derive(Debug, Clone)]
pub struct Pipeline {
    flattener: Flattener,
    filter: EntryFilter,
    on_bad_entry: BadEntryPolicy,
}

impl Pipeline {
    pub fn new(flattener: Flattener, filter: EntryFilter, on_bad_entry: BadEntryPolicy) -> Self {
        Self {
            flattener,
            filter,
            on_bad_entry,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Flattener::new(settings.mode, settings.separator.clone()),
            EntryFilter::new(settings.match_suffixes.clone()),
            settings.on_bad_entry,
        )
    }

    pub fn process(&self, archive_bytes: &[u8]) -> Result<ProcessReport, PipelineError> {
        let mut reader = ArchiveReader::open(archive_bytes)?;
        let matching: Vec<_> = reader
            .entries(&self.filter)?
            .into_iter()
            .filter(|e| e.is_match)
            .collect();

        if matching.is_empty() {
            return Err(PipelineError::NoMatchingEntries {
                suffixes: self.filter.suffixes().to_vec(),
            });
        }
        info!(
            total = reader.len(),
            matching = matching.len(),
            mode = ?self.flattener.mode(),
            "processing archive"
        );

        let mut records: Vec<FlatRecord> = Vec::new();
        let mut entries = Vec::with_capacity(matching.len());

        for entry in &matching {
            let _span = info_span!("entry", name = %entry.name).entered();

            let parsed = reader.read_entry_text(entry).and_then(|text| {
                parser::parse(&text).map_err(|source| PipelineError::DocumentParse {
                    entry: entry.name.clone(),
                    source,
                })
            });

            let doc = match (parsed, self.on_bad_entry) {
                (Ok(doc), _) => doc,
                (Err(err @ PipelineError::DocumentParse { .. }), BadEntryPolicy::Skip) => {
                    warn!(error = %err, "skipping entry");
                    entries.push(EntryOutcome {
                        name: entry.name.clone(),
                        status: EntryStatus::Skipped {
                            reason: err.to_string(),
                        },
                    });
                    continue;
                }
                (Err(err), _) => return Err(err),
            };

            let rows = self.flattener.flatten(&doc);
            debug!(records = rows.len(), "flattened entry");
            entries.push(EntryOutcome {
                name: entry.name.clone(),
                status: EntryStatus::Flattened {
                    records: rows.len(),
                },
            });
            records.extend(rows);
        }

        // Both modes land in the same shape: expanded rows are keyed, so their
        // header is inferred from the row keys in first-seen order.
        let table = Table::from_records(&records);
        if table.is_empty() || table.column_count() == 0 {
            return Err(PipelineError::NoRecords);
        }

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "archive flattened"
        );
        Ok(ProcessReport { table, entries })
    }
}

/// Flatten every `.json` entry of a zip archive into one table.
///
/// Any malformed entry fails the whole call.
pub fn process(archive_bytes: &[u8], mode: FlattenMode) -> Result<Table, PipelineError> {
    let pipeline = Pipeline::new(
        Flattener::new(mode, DEFAULT_SEPARATOR),
        EntryFilter::default(),
        BadEntryPolicy::Abort,
    );
    pipeline.process(archive_bytes).map(|report| report.table)
}
