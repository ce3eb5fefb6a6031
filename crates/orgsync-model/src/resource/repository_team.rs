//! Team access to repositories
//!
//! Config template: `repositories.{repo}.teams.{permission}[i]`, a scalar
//! team-name entry. Tracked under `github_team_repository`, so the state
//! index leads with the team.

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
pub struct RepositoryTeam {
    pub repository: String,
    pub team: String,
    pub permission: RepositoryPermission,
}

impl RepositoryTeam {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.team, self.repository)
    }

    fn config_base(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("teams"),
            PathSegment::key(self.permission.as_str()),
        ]
    }

    pub(crate) fn config_path(&self, document: &Document) -> Path {
        let mut path = self.config_base();
        let index = list_index(document, &path, &self.team);
        path.push(PathSegment::Index(index));
        path
    }
}

#[derive(Deserialize)]
struct RepositoryTeamValues {
    repository: String,
    team: String,
    permission: RepositoryPermission,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("teams"),
        ];
        for (permission_name, node) in entries(document, &base)? {
            let permission: RepositoryPermission = permission_name.parse()?;
            let location = format!("repositories.{repository}.teams.{permission_name}");
            for team in string_items(node, &location)? {
                resources.push(Resource::RepositoryTeam(RepositoryTeam {
                    repository: repository.to_string(),
                    team,
                    permission,
                }));
            }
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<RepositoryTeamValues>(
        resources,
        ResourceType::RepositoryTeam,
    )?
    .into_iter()
    .map(|v| {
        Resource::RepositoryTeam(RepositoryTeam {
            repository: v.repository,
            team: v.team,
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
        for record in client.repository_teams(&repository).await? {
            let repository_team = RepositoryTeam {
                repository: repository.clone(),
                team: record.team,
                permission: record.permission.parse()?,
            };
            desired.push((
                repository_team.state_index(),
                Resource::RepositoryTeam(repository_team),
            ));
        }
    }
    Ok(desired)
}
