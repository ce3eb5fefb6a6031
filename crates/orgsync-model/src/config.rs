//! High-level config document operations
//!
//! Wraps the document engine with resource-aware operations. Containment and
//! removal are keyed by config address, not by value: a resource "is present"
//! when another resource of the same kind resolves to the same path,
//! whatever its attributes say.

use std::path::Path as FsPath;

use orgsync_document::{Document, Path, apply_value_preserving};

use crate::error::Result;
use crate::resource::Resource;
use crate::types::ResourceType;

#[derive(Debug, Clone)]
pub struct ConfigDocument {
    document: Document,
}

impl ConfigDocument {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            document: Document::parse(source)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            document: Document::empty(),
        }
    }

    pub fn load(path: &FsPath) -> Result<Self> {
        Ok(Self {
            document: Document::load(path)?,
        })
    }

    pub fn save(&self, path: &FsPath) -> Result<()> {
        Ok(self.document.save(path)?)
    }

    pub fn to_source(&self) -> String {
        self.document.to_source()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All resources of `ty` currently present.
    pub fn resources(&self, ty: ResourceType) -> Result<Vec<Resource>> {
        Resource::from_config(&self.document, ty)
    }

    /// All resources of the given kinds, in kind order.
    pub fn all_resources(&self, types: &[ResourceType]) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();
        for ty in types {
            resources.extend(self.resources(*ty)?);
        }
        Ok(resources)
    }

    /// Look up the present resource occupying `resource`'s config address.
    pub fn find(&self, resource: &Resource) -> Result<Option<Resource>> {
        let target = resource.config_path(&self.document);
        Ok(self
            .resources(resource.resource_type())?
            .into_iter()
            .find(|candidate| candidate.config_path(&self.document) == target))
    }

    pub fn contains(&self, resource: &Resource) -> Result<bool> {
        Ok(self.find(resource)?.is_some())
    }

    /// Write `resource` at its config address, creating missing ancestor
    /// containers. Only differences are applied: unchanged scalars keep their
    /// comments, changed scalars are overwritten with comments cleared, and
    /// properties absent from the resource are deleted only under
    /// `allow_removal`. Returns whether the document changed.
    pub fn add_resource(&mut self, resource: &Resource, allow_removal: bool) -> Result<bool> {
        let path = resource.config_path(&self.document);
        let value = resource.config_value()?;
        let node = self.document.ensure_in(&path)?;
        let changed =
            apply_value_preserving(node, &value, allow_removal, resource.preserved_keys())?;
        if changed {
            tracing::debug!(address = %resource.state_address(), "updated config entry");
        }
        Ok(changed)
    }

    /// Delete the node at `resource`'s config address, if present. Child
    /// entries under it go with it.
    pub fn remove_resource(&mut self, resource: &Resource) -> bool {
        let path = resource.config_path(&self.document);
        if self.document.get_in(&path).is_none() {
            return false;
        }
        tracing::debug!(address = %resource.state_address(), "removing config entry");
        self.document.delete_in(&path).is_some()
    }

    /// Make the document kind-closed over `types`: remove every present
    /// resource whose config address no desired resource resolves to, then
    /// apply every desired resource destructively. Addresses are recomputed
    /// against the live document before each mutation, so removals that take
    /// child entries with them are accounted for.
    pub fn sync(&mut self, desired: &[Resource], types: &[ResourceType]) -> Result<()> {
        for ty in types {
            loop {
                let stale = self.find_stale(desired, *ty)?;
                match stale {
                    Some(resource) => {
                        self.remove_resource(&resource);
                    }
                    None => break,
                }
            }
        }
        for resource in desired {
            if types.contains(&resource.resource_type()) {
                self.add_resource(resource, true)?;
            }
        }
        Ok(())
    }

    fn find_stale(&self, desired: &[Resource], ty: ResourceType) -> Result<Option<Resource>> {
        let current = self.resources(ty)?;
        for resource in current {
            let path = resource.config_path(&self.document);
            let wanted = desired.iter().any(|d| {
                d.resource_type() == ty && d.config_path(&self.document) == path
            });
            if !wanted {
                return Ok(Some(resource));
            }
        }
        Ok(None)
    }

    /// Canonicalize: prune dead scaffolding (keeping the addresses of
    /// resources still present) and sort for deterministic output.
    pub fn format(&mut self, types: &[ResourceType]) -> Result<()> {
        let mut protected: Vec<Path> = Vec::new();
        for ty in types {
            for resource in self.resources(*ty)? {
                protected.push(resource.config_path(&self.document));
            }
        }
        self.document.format(&protected);
        Ok(())
    }
}
