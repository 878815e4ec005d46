use std::io::{Cursor, Read};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::PipelineError;
use crate::parser::ParseError;

pub const DEFAULT_SUFFIX: &str = ".json";

// Declared sizes come from the archive itself; never reserve more than this up front.
const MAX_PREALLOC: u64 = 1 << 20;

/// Decides which archive entries are structured documents.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    suffixes: Vec<String>,
}

impl EntryFilter {
    pub fn new(suffixes: Vec<String>) -> Self {
        let suffixes = if suffixes.is_empty() {
            vec![DEFAULT_SUFFIX.to_string()]
        } else {
            suffixes
        };
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn matches(&self, name: &str) -> bool {
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub index: usize,
    pub name: String,
    pub is_match: bool,
}

/// Read-only view over an in-memory zip archive.
pub struct ArchiveReader<'a> {
    zip: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ArchiveReader<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self, PipelineError> {
        let zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| PipelineError::InvalidArchive(e.to_string()))?;
        Ok(Self { zip })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Every entry in central-directory order. Directories never match.
    pub fn entries(&mut self, filter: &EntryFilter) -> Result<Vec<ArchiveEntry>, PipelineError> {
        let mut out = Vec::with_capacity(self.zip.len());
        for index in 0..self.zip.len() {
            let file = self
                .zip
                .by_index(index)
                .map_err(|e| PipelineError::InvalidArchive(format!("entry #{index}: {e}")))?;
            let name = file.name().to_string();
            let is_match = !file.is_dir() && filter.matches(&name);
            debug!(entry = %name, is_match, "listed archive entry");
            out.push(ArchiveEntry { index, name, is_match });
        }
        Ok(out)
    }

    pub fn read_entry_bytes(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>, PipelineError> {
        let mut file = self
            .zip
            .by_index(entry.index)
            .map_err(|e| PipelineError::InvalidArchive(format!("{}: {e}", entry.name)))?;
        let mut bytes = Vec::with_capacity(prealloc_hint(file.size()));
        file.read_to_end(&mut bytes)
            .map_err(|e| PipelineError::InvalidArchive(format!("{}: {e}", entry.name)))?;
        Ok(bytes)
    }

    pub fn read_entry_text(&mut self, entry: &ArchiveEntry) -> Result<String, PipelineError> {
        let bytes = self.read_entry_bytes(entry)?;
        String::from_utf8(bytes).map_err(|e| PipelineError::DocumentParse {
            entry: entry.name.clone(),
            source: ParseError::Encoding(e),
        })
    }
}

fn prealloc_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}

/// Uploads are only accepted under a `.zip` name.
pub fn ensure_archive_extension(path: &Path) -> Result<(), PipelineError> {
    let is_zip = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(())
    } else {
        Err(PipelineError::InvalidArchive(format!(
            "{} does not have a .zip extension",
            path.display()
        )))
    }
}
