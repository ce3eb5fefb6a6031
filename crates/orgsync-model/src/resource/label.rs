//! Issue labels
//!
//! Config template: `repositories.{repo}.labels.{name}`, an attribute map.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, repository_names, state_values};
use crate::state::StateResource;
use crate::types::ResourceType;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryLabel {
    pub repository: String,
    pub name: String,
    pub attributes: LabelAttributes,
}

impl RepositoryLabel {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.repository, self.name)
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("labels"),
            PathSegment::key(&self.name),
        ]
    }
}

#[derive(Deserialize)]
struct LabelValues {
    repository: String,
    name: String,
    #[serde(flatten)]
    attributes: LabelAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("labels"),
        ];
        for (name, node) in entries(document, &base)? {
            let mut location = base.to_vec();
            location.push(PathSegment::key(name));
            let attributes = attributes_at(node, &render_path(&location), &[])?;
            resources.push(Resource::RepositoryLabel(RepositoryLabel {
                repository: repository.to_string(),
                name: name.to_string(),
                attributes,
            }));
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(
        state_values::<LabelValues>(resources, ResourceType::RepositoryLabel)?
            .into_iter()
            .map(|v| {
                Resource::RepositoryLabel(RepositoryLabel {
                    repository: v.repository,
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
    let mut desired = Vec::new();
    for repository in repository_names(client).await? {
        for record in client.labels(&repository).await? {
            let label = RepositoryLabel {
                repository: repository.clone(),
                name: record.name,
                attributes: LabelAttributes {
                    color: record.color,
                    description: record.description,
                },
            };
            desired.push((label.state_index(), Resource::RepositoryLabel(label)));
        }
    }
    Ok(desired)
}
