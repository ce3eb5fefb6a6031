//! Model error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A resource type outside the catalog was requested.
    #[error("unsupported resource type: {name}")]
    UnsupportedResourceType { name: String },

    /// The directory reported a value the model cannot represent.
    #[error("unrepresentable {what}: {value:?}")]
    UnrepresentableValue { what: &'static str, value: String },

    /// A document node does not have the shape the resource template expects.
    #[error("unexpected shape at {path}: expected {expected}, found {found}")]
    StructuralMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A value record could not be deserialized into the resource's schema.
    #[error("invalid values at {location}: {source}")]
    Values {
        location: String,
        source: serde_json::Error,
    },

    /// The directory adapter failed.
    #[error("directory error: {message}")]
    Directory { message: String },

    #[error(transparent)]
    Document(#[from] orgsync_document::Error),
}

impl Error {
    pub fn unrepresentable(what: &'static str, value: impl Into<String>) -> Self {
        Self::UnrepresentableValue {
            what,
            value: value.into(),
        }
    }

    pub fn directory(message: impl Into<String>) -> Self {
        Self::Directory {
            message: message.into(),
        }
    }

    pub(crate) fn shape(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::StructuralMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    pub(crate) fn values(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Values {
            location: location.into(),
            source,
        }
    }
}
