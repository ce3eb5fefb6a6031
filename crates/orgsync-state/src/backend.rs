//! State backend seam
//!
//! The ledger itself lives behind an external process; this trait covers the
//! four operations the store needs. Process invocation, locking and retries
//! belong to the implementation.

use async_trait::async_trait;

use orgsync_model::StateResource;

use crate::error::Result;

#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Full-state query: every resource the backend currently tracks,
    /// whatever its mode.
    async fn pull(&self) -> Result<Vec<StateResource>>;

    /// Bind an external identity to an address.
    async fn import(&mut self, address: &str, id: &str) -> Result<()>;

    /// Unbind an address.
    async fn remove(&mut self, address: &str) -> Result<()>;

    /// Re-read attribute values from the live systems into the ledger.
    async fn refresh(&mut self) -> Result<()>;
}
