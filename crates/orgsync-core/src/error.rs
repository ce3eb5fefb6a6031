//! Engine error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] orgsync_model::Error),

    #[error(transparent)]
    State(#[from] orgsync_state::Error),
}
