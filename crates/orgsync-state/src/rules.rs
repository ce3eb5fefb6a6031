//! Sync rules
//!
//! Plain data loaded from a YAML file: which kinds are under management and
//! which attributes of a managed kind are excluded from tracking. A kind
//! absent from the allow-list is ignored entirely.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use orgsync_model::ResourceType;

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncRules {
    pub managed: Vec<ResourceType>,
    pub ignored_attributes: BTreeMap<ResourceType, Vec<String>>,
}

impl SyncRules {
    /// Rules placing every catalog kind under management.
    pub fn manage_all() -> Self {
        Self {
            managed: ResourceType::ALL.to_vec(),
            ignored_attributes: BTreeMap::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&source)?)
    }

    pub fn is_ignored(&self, ty: ResourceType) -> bool {
        !self.managed.contains(&ty)
    }

    /// Kinds under management, in catalog order regardless of list order in
    /// the rules file.
    pub fn managed_types(&self) -> Vec<ResourceType> {
        ResourceType::ALL
            .into_iter()
            .filter(|ty| !self.is_ignored(*ty))
            .collect()
    }

    pub fn ignored_attributes(&self, ty: ResourceType) -> &[String] {
        self.ignored_attributes
            .get(&ty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
