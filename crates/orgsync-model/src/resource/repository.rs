//! Repositories
//!
//! Config template: `repositories.{name}`, an attribute map. The same node
//! also hosts the child-resource containers listed in [`SUB_CONTAINERS`];
//! attribute extraction and application must leave those alone.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, state_values};
use crate::state::StateResource;
use crate::types::ResourceType;

/// Mapping keys under a repository node owned by child resource kinds.
pub(crate) const SUB_CONTAINERS: &[&str] = &[
    "branch_protection",
    "collaborators",
    "files",
    "labels",
    "rulesets",
    "teams",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_auto_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_update_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_discussions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: String,
    pub attributes: RepositoryAttributes,
}

impl Repository {
    pub(crate) fn state_index(&self) -> String {
        self.name.clone()
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.name),
        ]
    }
}

#[derive(Deserialize)]
struct RepositoryValues {
    name: String,
    #[serde(flatten)]
    attributes: RepositoryAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (name, node) in entries(document, &[PathSegment::key("repositories")])? {
        let location = render_path(&[
            PathSegment::key("repositories"),
            PathSegment::key(name),
        ]);
        let attributes = attributes_at(node, &location, SUB_CONTAINERS)?;
        resources.push(Resource::Repository(Repository {
            name: name.to_string(),
            attributes,
        }));
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(
        state_values::<RepositoryValues>(resources, ResourceType::Repository)?
            .into_iter()
            .map(|v| {
                Resource::Repository(Repository {
                    name: v.name,
                    attributes: v.attributes,
                })
            })
            .collect(),
    )
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    Ok(client
        .repositories()
        .await?
        .into_iter()
        .map(|record| {
            let repository = Repository {
                name: record.name,
                attributes: record.attributes,
            };
            (
                repository.state_index(),
                Resource::Repository(repository),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn config_extraction_skips_child_containers() {
        let document = Document::parse(
            "repositories:\n  example:\n    description: \"d\"\n    collaborators:\n      push:\n        - \"alice\"\n",
        )
        .unwrap();
        let resources = from_config(&document).unwrap();
        let Resource::Repository(repository) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(repository.name, "example");
        assert_eq!(repository.attributes.description.as_deref(), Some("d"));
    }

    #[test]
    fn bare_repository_has_unset_attributes() {
        let document = Document::parse("repositories:\n  bare:\n").unwrap();
        let resources = from_config(&document).unwrap();
        let Resource::Repository(repository) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(repository.attributes, RepositoryAttributes::default());
    }

    #[test]
    fn serialized_attributes_omit_unset_fields() {
        let attributes = RepositoryAttributes {
            description: Some("d".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attributes).unwrap(),
            json!({"description": "d"})
        );
    }

    #[test]
    fn state_values_tolerate_unknown_attributes() {
        let snapshot = vec![StateResource::new(
            "github_repository",
            "example",
            json!({"name": "example", "visibility": "public", "node_id": "xyz"}),
        )];
        let resources = from_state(&snapshot).unwrap();
        let Resource::Repository(repository) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(repository.attributes.visibility.as_deref(), Some("public"));
    }
}
