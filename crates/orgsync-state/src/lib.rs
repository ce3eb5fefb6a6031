//! Tracked-state store for orgsync
//!
//! The infrastructure-as-code ledger of resources under management: sync
//! rules deciding what is tracked, the [`StateBackend`] seam to the external
//! ledger process, and the [`TrackedState`] store keeping its bindings in
//! step with a desired set.

pub mod backend;
pub mod error;
pub mod rules;
pub mod store;

pub use backend::StateBackend;
pub use error::{Error, Result};
pub use rules::SyncRules;
pub use store::{StateSyncReport, TrackedState};
