//! Rulesets, organization-wide and per-repository
//!
//! Config templates: `rulesets.{name}` and
//! `repositories.{repo}.rulesets.{name}`, both attribute maps. The two kinds
//! share the attribute record and the directory record shape.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::{DirectoryClient, RulesetRecord};
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, repository_names, state_values};
use crate::state::StateResource;
use crate::types::{ResourceType, RulesetEnforcement, RulesetTarget};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforcement: Option<RulesetEnforcement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<RulesetTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl RulesetAttributes {
    fn from_record(record: &RulesetRecord) -> Result<Self> {
        Ok(Self {
            enforcement: Some(record.enforcement.parse()?),
            target: Some(record.target.parse()?),
            include: non_empty(&record.include),
            exclude: non_empty(&record.exclude),
        })
    }
}

// Empty pattern lists stay unset so the formatter has nothing to prune.
fn non_empty(patterns: &[String]) -> Option<Vec<String>> {
    if patterns.is_empty() {
        None
    } else {
        Some(patterns.to_vec())
    }
}

/// An organization-wide ruleset.
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub name: String,
    pub attributes: RulesetAttributes,
}

impl Ruleset {
    pub(crate) fn state_index(&self) -> String {
        self.name.clone()
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![PathSegment::key("rulesets"), PathSegment::key(&self.name)]
    }
}

/// A ruleset scoped to a single repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryRuleset {
    pub repository: String,
    pub name: String,
    pub attributes: RulesetAttributes,
}

impl RepositoryRuleset {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.repository, self.name)
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("rulesets"),
            PathSegment::key(&self.name),
        ]
    }
}

#[derive(Deserialize)]
struct RulesetValues {
    name: String,
    #[serde(flatten)]
    attributes: RulesetAttributes,
}

#[derive(Deserialize)]
struct RepositoryRulesetValues {
    repository: String,
    name: String,
    #[serde(flatten)]
    attributes: RulesetAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (name, node) in entries(document, &[PathSegment::key("rulesets")])? {
        let location = render_path(&[PathSegment::key("rulesets"), PathSegment::key(name)]);
        let attributes = attributes_at(node, &location, &[])?;
        resources.push(Resource::Ruleset(Ruleset {
            name: name.to_string(),
            attributes,
        }));
    }
    Ok(resources)
}

pub(crate) fn repository_from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("rulesets"),
        ];
        for (name, node) in entries(document, &base)? {
            let mut location = base.to_vec();
            location.push(PathSegment::key(name));
            let attributes = attributes_at(node, &render_path(&location), &[])?;
            resources.push(Resource::RepositoryRuleset(RepositoryRuleset {
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
        state_values::<RulesetValues>(resources, ResourceType::Ruleset)?
            .into_iter()
            .map(|v| {
                Resource::Ruleset(Ruleset {
                    name: v.name,
                    attributes: v.attributes,
                })
            })
            .collect(),
    )
}

pub(crate) fn repository_from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<RepositoryRulesetValues>(
        resources,
        ResourceType::RepositoryRuleset,
    )?
    .into_iter()
    .map(|v| {
        Resource::RepositoryRuleset(RepositoryRuleset {
            repository: v.repository,
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
    for record in client.rulesets().await? {
        let ruleset = Ruleset {
            attributes: RulesetAttributes::from_record(&record)?,
            name: record.name,
        };
        desired.push((ruleset.state_index(), Resource::Ruleset(ruleset)));
    }
    Ok(desired)
}

pub(crate) async fn repository_from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for repository in repository_names(client).await? {
        for record in client.repository_rulesets(&repository).await? {
            let ruleset = RepositoryRuleset {
                repository: repository.clone(),
                attributes: RulesetAttributes::from_record(&record)?,
                name: record.name,
            };
            desired.push((ruleset.state_index(), Resource::RepositoryRuleset(ruleset)));
        }
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn organization_and_repository_rulesets_have_distinct_addresses() {
        let org = Ruleset {
            name: "default".to_string(),
            attributes: RulesetAttributes::default(),
        };
        let repo = RepositoryRuleset {
            repository: "example".to_string(),
            name: "default".to_string(),
            attributes: RulesetAttributes::default(),
        };
        assert_eq!(
            Resource::Ruleset(org).state_address(),
            "github_organization_ruleset.this[\"default\"]"
        );
        assert_eq!(
            Resource::RepositoryRuleset(repo).state_address(),
            "github_repository_ruleset.this[\"example:default\"]"
        );
    }

    #[test]
    fn config_extraction_parses_enforcement() {
        let document = Document::parse(
            "rulesets:\n  default:\n    enforcement: \"active\"\n    target: \"branch\"\n    include:\n      - \"main\"\n",
        )
        .unwrap();
        let resources = from_config(&document).unwrap();
        let Resource::Ruleset(ruleset) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(
            ruleset.attributes.enforcement,
            Some(RulesetEnforcement::Active)
        );
        assert_eq!(ruleset.attributes.target, Some(RulesetTarget::Branch));
        assert_eq!(
            ruleset.attributes.include,
            Some(vec!["main".to_string()])
        );
    }
}
