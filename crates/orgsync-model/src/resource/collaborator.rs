//! Repository collaborators
//!
//! Config template: `repositories.{repo}.collaborators.{permission}[i]`, a
//! scalar username entry.

use serde::Deserialize;

use orgsync_document::{Document, Path, PathSegment};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{
    Resource, entries, list_index, repository_names, state_values, string_items,
};
use crate::state::StateResource;
use crate::types::{RepositoryPermission, ResourceType};

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryCollaborator {
    pub repository: String,
    pub username: String,
    pub permission: RepositoryPermission,
}

impl RepositoryCollaborator {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.repository, self.username)
    }

    fn config_base(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("collaborators"),
            PathSegment::key(self.permission.as_str()),
        ]
    }

    pub(crate) fn config_path(&self, document: &Document) -> Path {
        let mut path = self.config_base();
        let index = list_index(document, &path, &self.username);
        path.push(PathSegment::Index(index));
        path
    }
}

#[derive(Deserialize)]
struct CollaboratorValues {
    repository: String,
    username: String,
    permission: RepositoryPermission,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("collaborators"),
        ];
        for (permission_name, node) in entries(document, &base)? {
            let permission: RepositoryPermission = permission_name.parse()?;
            let location = format!("repositories.{repository}.collaborators.{permission_name}");
            for username in string_items(node, &location)? {
                resources.push(Resource::RepositoryCollaborator(RepositoryCollaborator {
                    repository: repository.to_string(),
                    username,
                    permission,
                }));
            }
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<CollaboratorValues>(
        resources,
        ResourceType::RepositoryCollaborator,
    )?
    .into_iter()
    .map(|v| {
        Resource::RepositoryCollaborator(RepositoryCollaborator {
            repository: v.repository,
            username: v.username,
            permission: v.permission,
        })
    })
    .collect())
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for repository in repository_names(client).await? {
        for record in client.collaborators(&repository).await? {
            let collaborator = RepositoryCollaborator {
                repository: repository.clone(),
                username: record.username,
                permission: record.permission.parse()?,
            };
            desired.push((
                collaborator.state_index(),
                Resource::RepositoryCollaborator(collaborator),
            ));
        }
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_extraction_walks_permission_lists() {
        let document = Document::parse(
            "repositories:\n  example:\n    collaborators:\n      push:\n        - \"alice\"\n      pull:\n        - \"bob\"\n",
        )
        .unwrap();
        let resources = from_config(&document).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(
            resources[0],
            Resource::RepositoryCollaborator(RepositoryCollaborator {
                repository: "example".to_string(),
                username: "alice".to_string(),
                permission: RepositoryPermission::Push,
            })
        );
    }

    #[test]
    fn state_index_joins_repository_and_username() {
        let collaborator = RepositoryCollaborator {
            repository: "example".to_string(),
            username: "alice".to_string(),
            permission: RepositoryPermission::Push,
        };
        assert_eq!(collaborator.state_index(), "example:alice");
        assert_eq!(
            Resource::RepositoryCollaborator(collaborator).state_address(),
            "github_repository_collaborator.this[\"example:alice\"]"
        );
    }
}
