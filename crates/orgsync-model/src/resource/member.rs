//! Organization members
//!
//! Config template: `members.{role}[i]`, a scalar username entry. Pending
//! invitations fold into extraction so invited users are tracked before they
//! accept.

use serde::Deserialize;

use orgsync_document::{Document, Path, PathSegment};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, entries, list_index, state_values, string_items};
use crate::state::StateResource;
use crate::types::{MemberRole, ResourceType};

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub username: String,
    pub role: MemberRole,
}

impl Member {
    pub(crate) fn state_index(&self) -> String {
        self.username.clone()
    }

    fn config_base(&self) -> Path {
        vec![
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
struct MemberValues {
    username: String,
    role: MemberRole,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (role_name, node) in entries(document, &[PathSegment::key("members")])? {
        let role: MemberRole = role_name.parse()?;
        for username in string_items(node, &format!("members.{role_name}"))? {
            resources.push(Resource::Member(Member { username, role }));
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<MemberValues>(resources, ResourceType::Member)?
        .into_iter()
        .map(|v| {
            Resource::Member(Member {
                username: v.username,
                role: v.role,
            })
        })
        .collect())
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for record in client.members().await? {
        let member = Member {
            role: record.role.parse()?,
            username: record.username,
        };
        desired.push((member.state_index(), Resource::Member(member)));
    }
    for record in client.invitations().await? {
        tracing::debug!(username = %record.username, "including pending invitation");
        let member = Member {
            role: record.role.parse()?,
            username: record.username,
        };
        desired.push((member.state_index(), Resource::Member(member)));
    }
    Ok(desired)
}
