//! State store error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend failed an operation against a specific address.
    #[error("backend {operation} failed for {address}: {message}")]
    Backend {
        operation: &'static str,
        address: String,
        message: String,
    },

    #[error("invalid sync rules: {0}")]
    Rules(#[from] serde_yaml::Error),

    #[error(transparent)]
    Model(#[from] orgsync_model::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn backend(
        operation: &'static str,
        address: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            operation,
            address: address.into(),
            message: message.into(),
        }
    }
}
