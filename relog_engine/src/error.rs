//! Error types for the normalizer and its file shell.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Unrecoverable failures. Anything not listed here degrades to leaving the
/// line untouched instead of aborting the run.
#[derive(Debug, Error)]
pub enum RelogError {
    #[error("invalid pattern in {category} rule #{index}: '{pattern}'")]
    PatternEngineFailure {
        category: String,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("'{}' is not valid UTF-8 text", path.display())]
    EncodingFailure {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
    #[error("could not back up '{}' before rewriting it", path.display())]
    BackupFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid player name '{0}': use only letters, spaces and apostrophes")]
    InvalidPlayerName(String),
    #[error("could not write archive '{}'", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Non-fatal problems noticed while scanning a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A combatant-info record with too few `&`-separated fields to carry a pet name.
    MalformedRecord { line_number: usize, fields: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MalformedRecord { line_number, fields } => write!(
                f,
                "line {line_number}: combatant info record has {fields} fields, pet name skipped"
            ),
        }
    }
}
