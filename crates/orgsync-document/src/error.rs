//! Error types for orgsync-document

/// Result type for orgsync-document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or mutating a document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("expected {expected} at {path}, found {found}")]
    StructuralMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("nested sequences are not supported at {path}")]
    NestedSequence { path: String },

    #[error("index {index} out of range at {path} (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("unsupported value: {message}")]
    UnsupportedValue { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structural(path: String, expected: &'static str, found: &'static str) -> Self {
        Self::StructuralMismatch {
            path,
            expected,
            found,
        }
    }
}
