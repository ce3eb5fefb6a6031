//! Tracked-state store
//!
//! Holds the snapshot of resources currently under management and keeps the
//! backend's bindings in step with a desired set. Binding and unbinding are
//! address-keyed: two identities that collide on state address share one
//! slot, last writer wins.

use serde_json::Value;

use orgsync_model::{Resource, ResourceType, StateResource};

use crate::backend::StateBackend;
use crate::error::{Error, Result};
use crate::rules::SyncRules;

/// Outcome of one [`TrackedState::sync`] pass. Per-resource backend failures
/// are collected rather than aborting the pass; a non-empty `errors` list
/// marks the run degraded.
#[derive(Debug, Default)]
pub struct StateSyncReport {
    pub imported: usize,
    pub removed: usize,
    pub errors: Vec<Error>,
}

impl StateSyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct TrackedState {
    backend: Box<dyn StateBackend>,
    rules: SyncRules,
    resources: Vec<StateResource>,
}

impl TrackedState {
    /// A store with an empty snapshot; call [`pull`](Self::pull) or use
    /// [`load`](Self::load) to populate it.
    pub fn new(backend: Box<dyn StateBackend>, rules: SyncRules) -> Self {
        Self {
            backend,
            rules,
            resources: Vec::new(),
        }
    }

    pub async fn load(backend: Box<dyn StateBackend>, rules: SyncRules) -> Result<Self> {
        let mut store = Self::new(backend, rules);
        store.pull().await?;
        Ok(store)
    }

    /// Re-read the backend's full state and re-apply the sync rules.
    pub async fn pull(&mut self) -> Result<()> {
        let raw = self.backend.pull().await?;
        self.resources = apply_rules(raw, &self.rules);
        Ok(())
    }

    /// Ask the backend to re-read live attribute values, then re-pull.
    pub async fn refresh(&mut self) -> Result<()> {
        self.backend.refresh().await?;
        self.pull().await
    }

    pub fn rules(&self) -> &SyncRules {
        &self.rules
    }

    pub fn is_ignored(&self, ty: ResourceType) -> bool {
        self.rules.is_ignored(ty)
    }

    /// Addresses currently bound, in snapshot order.
    pub fn addresses(&self) -> Vec<String> {
        self.resources.iter().map(StateResource::address).collect()
    }

    pub fn snapshot(&self) -> &[StateResource] {
        &self.resources
    }

    /// Every managed resource in the snapshot, in catalog order.
    pub fn all_resources(&self) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for ty in self.rules.managed_types() {
            resources.extend(Resource::from_state(&self.resources, ty)?);
        }
        Ok(resources)
    }

    /// Bring the backend's bindings in line with `desired`: unbind every
    /// bound address absent from the desired set, then bind every desired
    /// address not yet bound using its import identifier. Resources of
    /// unmanaged kinds are never bound. The snapshot itself is not updated;
    /// callers follow up with [`refresh`](Self::refresh).
    pub async fn sync(&mut self, desired: &[(String, Resource)]) -> StateSyncReport {
        let mut report = StateSyncReport::default();

        let mut slots: Vec<(String, &str)> = Vec::new();
        for (id, resource) in desired {
            let ty = resource.resource_type();
            if self.rules.is_ignored(ty) {
                tracing::debug!(kind = %ty, "skipping resource of unmanaged kind");
                continue;
            }
            let address = resource.state_address();
            match slots.iter_mut().find(|(slot, _)| *slot == address) {
                Some((_, id_slot)) => {
                    tracing::debug!(address = %address, "state address collision, last writer wins");
                    *id_slot = id.as_str();
                }
                None => slots.push((address, id.as_str())),
            }
        }

        let bound = self.addresses();
        for address in &bound {
            if slots.iter().any(|(slot, _)| slot == address) {
                continue;
            }
            match self.backend.remove(address).await {
                Ok(()) => {
                    tracing::debug!(address = %address, "untracked stale resource");
                    report.removed += 1;
                }
                Err(error) => {
                    tracing::warn!(address = %address, %error, "failed to untrack resource");
                    report.errors.push(error);
                }
            }
        }

        for (address, id) in &slots {
            if bound.contains(address) {
                continue;
            }
            match self.backend.import(address, id).await {
                Ok(()) => {
                    tracing::debug!(address = %address, "imported resource");
                    report.imported += 1;
                }
                Err(error) => {
                    tracing::warn!(address = %address, %error, "failed to import resource");
                    report.errors.push(error);
                }
            }
        }

        tracing::info!(
            imported = report.imported,
            removed = report.removed,
            failed = report.errors.len(),
            "state sync complete"
        );
        report
    }
}

/// Filter a raw snapshot down to managed-mode resources of managed kinds and
/// strip ignored attributes from their value records.
fn apply_rules(resources: Vec<StateResource>, rules: &SyncRules) -> Vec<StateResource> {
    resources
        .into_iter()
        .filter(|resource| {
            if !resource.is_managed() {
                return false;
            }
            match ResourceType::from_state_type(&resource.state_type) {
                Ok(ty) => !rules.is_ignored(ty),
                Err(_) => false,
            }
        })
        .map(|mut resource| {
            if let Ok(ty) = ResourceType::from_state_type(&resource.state_type) {
                if let Value::Object(map) = &mut resource.values {
                    for attribute in rules.ignored_attributes(ty) {
                        map.remove(attribute);
                    }
                }
            }
            resource
        })
        .collect()
}
