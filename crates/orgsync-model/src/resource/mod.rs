//! Resource catalog
//!
//! One module per kind. Each kind knows how to extract itself from the three
//! representations (directory, tracked state, config document) and how to
//! render its two deterministic addresses. Identity is the natural-key tuple;
//! attributes never participate in equality between representations.

pub mod branch_protection;
pub mod collaborator;
pub mod file;
pub mod label;
pub mod member;
pub mod repository;
pub mod repository_team;
pub mod ruleset;
pub mod team;
pub mod team_member;

pub use branch_protection::{BranchProtectionAttributes, BranchProtectionRule};
pub use collaborator::RepositoryCollaborator;
pub use file::{FileAttributes, RepositoryFile};
pub use label::{LabelAttributes, RepositoryLabel};
pub use member::Member;
pub use repository::{Repository, RepositoryAttributes};
pub use repository_team::RepositoryTeam;
pub use ruleset::{Ruleset, RulesetAttributes, RepositoryRuleset};
pub use team::{Team, TeamAttributes};
pub use team_member::TeamMember;

use serde::de::DeserializeOwned;
use serde_json::Value;

use orgsync_document::{Document, Node, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::{Error, Result};
use crate::state::{StateResource, render_address};
use crate::types::ResourceType;

/// One resource of any kind in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Member(Member),
    Repository(Repository),
    Team(Team),
    RepositoryCollaborator(RepositoryCollaborator),
    RepositoryTeam(RepositoryTeam),
    TeamMember(TeamMember),
    RepositoryFile(RepositoryFile),
    RepositoryLabel(RepositoryLabel),
    RepositoryBranchProtectionRule(BranchProtectionRule),
    Ruleset(Ruleset),
    RepositoryRuleset(RepositoryRuleset),
}

impl Resource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Member(_) => ResourceType::Member,
            Resource::Repository(_) => ResourceType::Repository,
            Resource::Team(_) => ResourceType::Team,
            Resource::RepositoryCollaborator(_) => ResourceType::RepositoryCollaborator,
            Resource::RepositoryTeam(_) => ResourceType::RepositoryTeam,
            Resource::TeamMember(_) => ResourceType::TeamMember,
            Resource::RepositoryFile(_) => ResourceType::RepositoryFile,
            Resource::RepositoryLabel(_) => ResourceType::RepositoryLabel,
            Resource::RepositoryBranchProtectionRule(_) => {
                ResourceType::RepositoryBranchProtectionRule
            }
            Resource::Ruleset(_) => ResourceType::Ruleset,
            Resource::RepositoryRuleset(_) => ResourceType::RepositoryRuleset,
        }
    }

    /// The index part of the state address, a pure function of identity.
    pub fn state_index(&self) -> String {
        match self {
            Resource::Member(r) => r.state_index(),
            Resource::Repository(r) => r.state_index(),
            Resource::Team(r) => r.state_index(),
            Resource::RepositoryCollaborator(r) => r.state_index(),
            Resource::RepositoryTeam(r) => r.state_index(),
            Resource::TeamMember(r) => r.state_index(),
            Resource::RepositoryFile(r) => r.state_index(),
            Resource::RepositoryLabel(r) => r.state_index(),
            Resource::RepositoryBranchProtectionRule(r) => r.state_index(),
            Resource::Ruleset(r) => r.state_index(),
            Resource::RepositoryRuleset(r) => r.state_index(),
        }
    }

    /// The canonical tracked-state address.
    pub fn state_address(&self) -> String {
        render_address(self.resource_type().state_type(), &self.state_index())
    }

    /// The identifier handed to the backend when importing this resource.
    pub fn import_id(&self) -> String {
        self.state_index()
    }

    /// The path of this resource's node in `document`. Total: never mutates,
    /// and stable given the same identity and document contents. For
    /// list-valued leaves the final index is the identity's current position,
    /// or the first unused slot when absent.
    pub fn config_path(&self, document: &Document) -> Path {
        match self {
            Resource::Member(r) => r.config_path(document),
            Resource::Repository(r) => r.config_path(),
            Resource::Team(r) => r.config_path(),
            Resource::RepositoryCollaborator(r) => r.config_path(document),
            Resource::RepositoryTeam(r) => r.config_path(document),
            Resource::TeamMember(r) => r.config_path(document),
            Resource::RepositoryFile(r) => r.config_path(),
            Resource::RepositoryLabel(r) => r.config_path(),
            Resource::RepositoryBranchProtectionRule(r) => r.config_path(),
            Resource::Ruleset(r) => r.config_path(),
            Resource::RepositoryRuleset(r) => r.config_path(),
        }
    }

    /// The plain value this resource serializes to at its config path.
    pub fn config_value(&self) -> Result<Value> {
        match self {
            Resource::Member(r) => Ok(Value::String(r.username.clone())),
            Resource::Repository(r) => attribute_value(&r.attributes),
            Resource::Team(r) => attribute_value(&r.attributes),
            Resource::RepositoryCollaborator(r) => Ok(Value::String(r.username.clone())),
            Resource::RepositoryTeam(r) => Ok(Value::String(r.team.clone())),
            Resource::TeamMember(r) => Ok(Value::String(r.username.clone())),
            Resource::RepositoryFile(r) => attribute_value(&r.attributes),
            Resource::RepositoryLabel(r) => attribute_value(&r.attributes),
            Resource::RepositoryBranchProtectionRule(r) => attribute_value(&r.attributes),
            Resource::Ruleset(r) => attribute_value(&r.attributes),
            Resource::RepositoryRuleset(r) => attribute_value(&r.attributes),
        }
    }

    /// Mapping keys at this resource's node that belong to child resources
    /// and must survive a destructive attribute application.
    pub fn preserved_keys(&self) -> &'static [&'static str] {
        match self {
            Resource::Repository(_) => repository::SUB_CONTAINERS,
            Resource::Team(_) => team::SUB_CONTAINERS,
            _ => &[],
        }
    }

    /// Extract all resources of `ty` present in the config document.
    pub fn from_config(document: &Document, ty: ResourceType) -> Result<Vec<Resource>> {
        match ty {
            ResourceType::Member => member::from_config(document),
            ResourceType::Repository => repository::from_config(document),
            ResourceType::Team => team::from_config(document),
            ResourceType::RepositoryCollaborator => collaborator::from_config(document),
            ResourceType::RepositoryTeam => repository_team::from_config(document),
            ResourceType::TeamMember => team_member::from_config(document),
            ResourceType::RepositoryFile => file::from_config(document),
            ResourceType::RepositoryLabel => label::from_config(document),
            ResourceType::RepositoryBranchProtectionRule => {
                branch_protection::from_config(document)
            }
            ResourceType::Ruleset => ruleset::from_config(document),
            ResourceType::RepositoryRuleset => ruleset::repository_from_config(document),
        }
    }

    /// Extract all resources of `ty` from a tracked-state snapshot.
    pub fn from_state(resources: &[StateResource], ty: ResourceType) -> Result<Vec<Resource>> {
        match ty {
            ResourceType::Member => member::from_state(resources),
            ResourceType::Repository => repository::from_state(resources),
            ResourceType::Team => team::from_state(resources),
            ResourceType::RepositoryCollaborator => collaborator::from_state(resources),
            ResourceType::RepositoryTeam => repository_team::from_state(resources),
            ResourceType::TeamMember => team_member::from_state(resources),
            ResourceType::RepositoryFile => file::from_state(resources),
            ResourceType::RepositoryLabel => label::from_state(resources),
            ResourceType::RepositoryBranchProtectionRule => {
                branch_protection::from_state(resources)
            }
            ResourceType::Ruleset => ruleset::from_state(resources),
            ResourceType::RepositoryRuleset => ruleset::repository_from_state(resources),
        }
    }

    /// Extract the directory's desired set for `ty`, paired with import
    /// identifiers. `known` is the set already of interest; kinds that cannot
    /// be enumerated wholesale (files) narrow their lookups to it.
    pub async fn from_directory(
        client: &dyn DirectoryClient,
        ty: ResourceType,
        known: &[Resource],
    ) -> Result<Vec<(String, Resource)>> {
        match ty {
            ResourceType::Member => member::from_directory(client).await,
            ResourceType::Repository => repository::from_directory(client).await,
            ResourceType::Team => team::from_directory(client).await,
            ResourceType::RepositoryCollaborator => collaborator::from_directory(client).await,
            ResourceType::RepositoryTeam => repository_team::from_directory(client).await,
            ResourceType::TeamMember => team_member::from_directory(client).await,
            ResourceType::RepositoryFile => file::from_directory(client, known).await,
            ResourceType::RepositoryLabel => label::from_directory(client).await,
            ResourceType::RepositoryBranchProtectionRule => {
                branch_protection::from_directory(client).await
            }
            ResourceType::Ruleset => ruleset::from_directory(client).await,
            ResourceType::RepositoryRuleset => ruleset::repository_from_directory(client).await,
        }
    }
}

fn attribute_value<T: serde::Serialize>(attributes: &T) -> Result<Value> {
    serde_json::to_value(attributes).map_err(|source| Error::values("attributes", source))
}

/// Mapping entries at `path`. Absent or null containers are empty, any other
/// shape is a structural mismatch.
pub(crate) fn entries<'a>(
    document: &'a Document,
    path: &[PathSegment],
) -> Result<Vec<(&'a str, &'a Node)>> {
    let Some(node) = document.get_in(path) else {
        return Ok(Vec::new());
    };
    if node.is_null() {
        return Ok(Vec::new());
    }
    match node.as_mapping() {
        Some(pairs) => Ok(pairs.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        None => Err(Error::shape(
            render_path(path),
            "mapping",
            node.value.kind_name(),
        )),
    }
}

/// String items of a sequence node. Null is an empty list.
pub(crate) fn string_items(node: &Node, location: &str) -> Result<Vec<String>> {
    if node.is_null() {
        return Ok(Vec::new());
    }
    let Some(items) = node.as_sequence() else {
        return Err(Error::shape(
            location.to_string(),
            "sequence",
            node.value.kind_name(),
        ));
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                Error::shape(location.to_string(), "scalar", item.value.kind_name())
            })
        })
        .collect()
}

/// Resolve the index of `value` in the list at `base`: its current position
/// if present, else the first unused slot (the list length; 0 when the list
/// is absent).
pub(crate) fn list_index(document: &Document, base: &[PathSegment], value: &str) -> usize {
    let Some(node) = document.get_in(base) else {
        return 0;
    };
    let Some(items) = node.as_sequence() else {
        return 0;
    };
    items
        .iter()
        .position(|item| item.as_str() == Some(value))
        .unwrap_or(items.len())
}

/// Deserialize a node's plain value into an attribute record, dropping the
/// `strip` keys first (child-resource containers sharing the node).
pub(crate) fn attributes_at<T: DeserializeOwned>(
    node: &Node,
    location: &str,
    strip: &[&str],
) -> Result<T> {
    let mut value = node.to_value();
    match &mut value {
        Value::Null => value = Value::Object(serde_json::Map::new()),
        Value::Object(map) => {
            for key in strip {
                map.remove(*key);
            }
        }
        _ => {
            return Err(Error::shape(
                location.to_string(),
                "mapping",
                node.value.kind_name(),
            ));
        }
    }
    serde_json::from_value(value).map_err(|source| Error::values(location.to_string(), source))
}

/// Filter a snapshot to managed resources of `ty` and deserialize their
/// value records.
pub(crate) fn state_values<T: DeserializeOwned>(
    resources: &[StateResource],
    ty: ResourceType,
) -> Result<Vec<T>> {
    resources
        .iter()
        .filter(|r| r.is_managed() && r.state_type == ty.state_type())
        .map(|r| {
            serde_json::from_value(r.values.clone()).map_err(|source| Error::values(r.address(), source))
        })
        .collect()
}

/// Names of all repositories the directory currently has. Child kinds under
/// a repository enumerate through this.
pub(crate) async fn repository_names(client: &dyn DirectoryClient) -> Result<Vec<String>> {
    Ok(client
        .repositories()
        .await?
        .into_iter()
        .map(|record| record.name)
        .collect())
}
