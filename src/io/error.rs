use std::path::PathBuf;

use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: u64,
        details: String,
    },

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("the {0} input has no header row")]
    EmptyInput(Format),
}

impl Error {
    pub fn parse(format: Format, line: u64, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub(crate) fn from_csv(format: Format, err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line());
        let details = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::Io { source },
            _ => Self::parse(format, line, details),
        }
    }
}
