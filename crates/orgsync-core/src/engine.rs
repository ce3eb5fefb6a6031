//! Two-phase reconciliation
//!
//! Phase 1 lets the directory drive what is tracked: extract the desired set
//! per managed kind and sync the tracked-state store to it. Phase 2 lets
//! tracked state drive the document: re-extract the tracked set and sync the
//! config document to it. The document is never updated from the directory
//! directly, so ignore rules and attribute exclusions are enforced in one
//! place. Both phases are idempotent; a failed run is recovered by running
//! again.

use orgsync_model::{ConfigDocument, DirectoryClient, Resource, ResourceType};
use orgsync_state::TrackedState;

use crate::error::Result;

/// Summary of one engine run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Resources the directory wants tracked.
    pub desired: usize,
    /// Addresses newly bound in the tracked-state store.
    pub imported: usize,
    /// Addresses unbound from the tracked-state store.
    pub removed: usize,
    /// Per-resource backend failures tolerated during the state sync.
    pub state_errors: usize,
    /// Whether the document now serializes differently from its source.
    pub document_changed: bool,
}

pub struct Engine {
    directory: Box<dyn DirectoryClient>,
    state: TrackedState,
}

impl Engine {
    pub fn new(directory: Box<dyn DirectoryClient>, state: TrackedState) -> Self {
        Self { directory, state }
    }

    pub fn state(&self) -> &TrackedState {
        &self.state
    }

    /// Reconcile the tracked-state store with the directory, then the config
    /// document with the tracked-state store. The caller persists the
    /// document afterwards.
    pub async fn run(&mut self, config: &mut ConfigDocument) -> Result<RunReport> {
        let managed = self.state.rules().managed_types();

        let mut desired: Vec<(String, Resource)> = Vec::new();
        for ty in &managed {
            // present config entries hint directory extraction for kinds
            // that cannot be enumerated wholesale
            let known = config.resources(*ty)?;
            let found = Resource::from_directory(self.directory.as_ref(), *ty, &known).await?;
            tracing::info!(kind = %ty, count = found.len(), "extracted directory resources");
            desired.extend(found);
        }

        let state_report = self.state.sync(&desired).await;
        self.state.refresh().await?;

        let tracked = self.state.all_resources()?;
        tracing::info!(count = tracked.len(), "syncing config document to tracked state");
        config.sync(&tracked, &managed)?;
        // formatting protects every kind present, not just the managed ones;
        // an unmanaged entry a human wrote stays even while empty
        config.format(&ResourceType::ALL)?;

        Ok(RunReport {
            desired: desired.len(),
            imported: state_report.imported,
            removed: state_report.removed,
            state_errors: state_report.errors.len(),
            document_changed: config.is_modified(),
        })
    }
}
