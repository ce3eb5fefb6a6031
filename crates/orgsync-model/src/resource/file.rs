//! Tracked repository files
//!
//! Config template: `repositories.{repo}.files.{path}`, an attribute map.
//! Files cannot be enumerated from the directory wholesale; extraction only
//! re-checks paths already under management.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, state_values};
use crate::state::StateResource;
use crate::types::ResourceType;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryFile {
    pub repository: String,
    pub path: String,
    pub attributes: FileAttributes,
}

impl RepositoryFile {
    pub(crate) fn state_index(&self) -> String {
        format!("{}/{}", self.repository, self.path)
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("files"),
            PathSegment::key(&self.path),
        ]
    }
}

#[derive(Deserialize)]
struct FileValues {
    repository: String,
    path: String,
    #[serde(flatten)]
    attributes: FileAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("files"),
        ];
        for (path, node) in entries(document, &base)? {
            let mut location = base.to_vec();
            location.push(PathSegment::key(path));
            let attributes = attributes_at(node, &render_path(&location), &[])?;
            resources.push(Resource::RepositoryFile(RepositoryFile {
                repository: repository.to_string(),
                path: path.to_string(),
                attributes,
            }));
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(
        state_values::<FileValues>(resources, ResourceType::RepositoryFile)?
            .into_iter()
            .map(|v| {
                Resource::RepositoryFile(RepositoryFile {
                    repository: v.repository,
                    path: v.path,
                    attributes: v.attributes,
                })
            })
            .collect(),
    )
}

/// Point lookups over the `known` set only. A file the directory no longer
/// has simply drops out of the desired set.
pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
    known: &[Resource],
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for resource in known {
        let Resource::RepositoryFile(file) = resource else {
            continue;
        };
        match client.repository_file(&file.repository, &file.path).await? {
            Some(record) => {
                let found = RepositoryFile {
                    repository: file.repository.clone(),
                    path: file.path.clone(),
                    attributes: record.attributes,
                };
                desired.push((found.state_index(), Resource::RepositoryFile(found)));
            }
            None => {
                tracing::debug!(
                    repository = %file.repository,
                    path = %file.path,
                    "tracked file no longer present in directory"
                );
            }
        }
    }
    Ok(desired)
}
