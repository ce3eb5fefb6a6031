//! Team membership
//!
//! Config template: `teams.{team}.members.{role}[i]`, a scalar username
//! entry.

use serde::Deserialize;

use orgsync_document::{Document, Path, PathSegment};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, entries, list_index, state_values, string_items};
use crate::state::StateResource;
use crate::types::{ResourceType, TeamRole};

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub team: String,
    pub username: String,
    pub role: TeamRole,
}

impl TeamMember {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.team, self.username)
    }

    fn config_base(&self) -> Path {
        vec![
            PathSegment::key("teams"),
            PathSegment::key(&self.team),
            PathSegment::key("members"),
            PathSegment::key(self.role.as_str()),
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
struct TeamMemberValues {
    team: String,
    username: String,
    role: TeamRole,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (team, _) in entries(document, &[PathSegment::key("teams")])? {
        let base = [
            PathSegment::key("teams"),
            PathSegment::key(team),
            PathSegment::key("members"),
        ];
        for (role_name, node) in entries(document, &base)? {
            let role: TeamRole = role_name.parse()?;
            let location = format!("teams.{team}.members.{role_name}");
            for username in string_items(node, &location)? {
                resources.push(Resource::TeamMember(TeamMember {
                    team: team.to_string(),
                    username,
                    role,
                }));
            }
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(
        state_values::<TeamMemberValues>(resources, ResourceType::TeamMember)?
            .into_iter()
            .map(|v| {
                Resource::TeamMember(TeamMember {
                    team: v.team,
                    username: v.username,
                    role: v.role,
                })
            })
            .collect(),
    )
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for team_record in client.teams().await? {
        for record in client.team_members(&team_record.name).await? {
            let team_member = TeamMember {
                team: team_record.name.clone(),
                username: record.username,
                role: record.role.parse()?,
            };
            desired.push((
                team_member.state_index(),
                Resource::TeamMember(team_member),
            ));
        }
    }
    Ok(desired)
}
