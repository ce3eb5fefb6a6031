//! Teams
//!
//! Config template: `teams.{name}`, an attribute map sharing its node with
//! the `members` child container.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, state_values};
use crate::state::StateResource;
use crate::types::{ResourceType, TeamPrivacy};

pub(crate) const SUB_CONTAINERS: &[&str] = &["members"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<TeamPrivacy>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub attributes: TeamAttributes,
}

impl Team {
    pub(crate) fn state_index(&self) -> String {
        self.name.clone()
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![PathSegment::key("teams"), PathSegment::key(&self.name)]
    }
}

#[derive(Deserialize)]
struct TeamValues {
    name: String,
    #[serde(flatten)]
    attributes: TeamAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (name, node) in entries(document, &[PathSegment::key("teams")])? {
        let location = render_path(&[PathSegment::key("teams"), PathSegment::key(name)]);
        let attributes = attributes_at(node, &location, SUB_CONTAINERS)?;
        resources.push(Resource::Team(Team {
            name: name.to_string(),
            attributes,
        }));
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<TeamValues>(resources, ResourceType::Team)?
        .into_iter()
        .map(|v| {
            Resource::Team(Team {
                name: v.name,
                attributes: v.attributes,
            })
        })
        .collect())
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for record in client.teams().await? {
        let team = Team {
            attributes: TeamAttributes {
                description: record.description,
                privacy: Some(record.privacy.parse()?),
            },
            name: record.name,
        };
        desired.push((team.state_index(), Resource::Team(team)));
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_extraction_skips_member_container() {
        let document = Document::parse(
            "teams:\n  core:\n    privacy: \"closed\"\n    members:\n      maintainer:\n        - \"alice\"\n",
        )
        .unwrap();
        let resources = from_config(&document).unwrap();
        let Resource::Team(team) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(team.name, "core");
        assert_eq!(team.attributes.privacy, Some(TeamPrivacy::Closed));
    }

    #[test]
    fn unknown_privacy_in_config_fails() {
        let document = Document::parse("teams:\n  core:\n    privacy: \"visible\"\n").unwrap();
        assert!(from_config(&document).is_err());
    }
}
