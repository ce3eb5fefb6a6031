//! Reconciliation engine for orgsync
//!
//! Ties the resource catalog, the tracked-state store and the config
//! document together into the two-phase sync described in [`engine`].

pub mod engine;
pub mod error;

pub use engine::{Engine, RunReport};
pub use error::{Error, Result};

pub use orgsync_model::{ConfigDocument, DirectoryClient, Resource, ResourceType};
pub use orgsync_state::{StateBackend, SyncRules, TrackedState};
