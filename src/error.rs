use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Coarse failure class, suitable for a status code or an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputFormat,
    NoData,
    DocumentParse,
    OutputWrite,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("uploaded file is not a valid zip archive: {0}")]
    InvalidArchive(String),

    #[error("archive contains no entries ending in {suffixes:?}")]
    NoMatchingEntries { suffixes: Vec<String> },

    #[error("archive entries produced no rows")]
    NoRecords,

    #[error("entry `{entry}` could not be parsed: {source}")]
    DocumentParse {
        entry: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to write {}: {reason}", path.display())]
    OutputWrite { path: PathBuf, reason: String },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidArchive(_) => ErrorKind::InputFormat,
            PipelineError::NoMatchingEntries { .. } | PipelineError::NoRecords => ErrorKind::NoData,
            PipelineError::DocumentParse { .. } => ErrorKind::DocumentParse,
            PipelineError::OutputWrite { .. } => ErrorKind::OutputWrite,
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::OutputWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(PipelineError::InvalidArchive("x".into()).kind(), ErrorKind::InputFormat);
        assert_eq!(PipelineError::NoRecords.kind(), ErrorKind::NoData);
        assert_eq!(
            PipelineError::NoMatchingEntries { suffixes: vec![".json".into()] }.kind(),
            ErrorKind::NoData
        );
        assert_eq!(PipelineError::output("out.xlsx", "disk full").kind(), ErrorKind::OutputWrite);
    }

    #[test]
    fn parse_failure_names_entry() {
        let source = crate::parser::parse("{").unwrap_err();
        let err = PipelineError::DocumentParse {
            entry: "orders/1.json".into(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::DocumentParse);
        assert!(err.to_string().contains("orders/1.json"));
    }
}
