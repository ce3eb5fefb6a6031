//! Branch protection rules
//!
//! Config template: `repositories.{repo}.branch_protection.{pattern}`, an
//! attribute map keyed by the protected branch pattern.

use serde::{Deserialize, Serialize};

use orgsync_document::{Document, Path, PathSegment, render_path};

use crate::directory::DirectoryClient;
use crate::error::Result;
use crate::resource::{Resource, attributes_at, entries, repository_names, state_values};
use crate::state::StateResource;
use crate::types::ResourceType;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchProtectionAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_deletions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_force_pushes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_admins: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_conversation_resolution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_signed_commits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchProtectionRule {
    pub repository: String,
    pub pattern: String,
    pub attributes: BranchProtectionAttributes,
}

impl BranchProtectionRule {
    pub(crate) fn state_index(&self) -> String {
        format!("{}:{}", self.repository, self.pattern)
    }

    pub(crate) fn config_path(&self) -> Path {
        vec![
            PathSegment::key("repositories"),
            PathSegment::key(&self.repository),
            PathSegment::key("branch_protection"),
            PathSegment::key(&self.pattern),
        ]
    }
}

#[derive(Deserialize)]
struct BranchProtectionValues {
    repository: String,
    pattern: String,
    #[serde(flatten)]
    attributes: BranchProtectionAttributes,
}

pub(crate) fn from_config(document: &Document) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for (repository, _) in entries(document, &[PathSegment::key("repositories")])? {
        let base = [
            PathSegment::key("repositories"),
            PathSegment::key(repository),
            PathSegment::key("branch_protection"),
        ];
        for (pattern, node) in entries(document, &base)? {
            let mut location = base.to_vec();
            location.push(PathSegment::key(pattern));
            let attributes = attributes_at(node, &render_path(&location), &[])?;
            resources.push(Resource::RepositoryBranchProtectionRule(
                BranchProtectionRule {
                    repository: repository.to_string(),
                    pattern: pattern.to_string(),
                    attributes,
                },
            ));
        }
    }
    Ok(resources)
}

pub(crate) fn from_state(resources: &[StateResource]) -> Result<Vec<Resource>> {
    Ok(state_values::<BranchProtectionValues>(
        resources,
        ResourceType::RepositoryBranchProtectionRule,
    )?
    .into_iter()
    .map(|v| {
        Resource::RepositoryBranchProtectionRule(BranchProtectionRule {
            repository: v.repository,
            pattern: v.pattern,
            attributes: v.attributes,
        })
    })
    .collect())
}

pub(crate) async fn from_directory(
    client: &dyn DirectoryClient,
) -> Result<Vec<(String, Resource)>> {
    let mut desired = Vec::new();
    for repository in repository_names(client).await? {
        for record in client.branch_protection(&repository).await? {
            let rule = BranchProtectionRule {
                repository: repository.clone(),
                pattern: record.pattern,
                attributes: record.attributes,
            };
            desired.push((
                rule.state_index(),
                Resource::RepositoryBranchProtectionRule(rule),
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
    fn config_extraction_reads_pattern_maps() {
        let document = Document::parse(
            "repositories:\n  example:\n    branch_protection:\n      main:\n        enforce_admins: true\n        required_approving_review_count: 2\n",
        )
        .unwrap();
        let resources = from_config(&document).unwrap();
        let Resource::RepositoryBranchProtectionRule(rule) = &resources[0] else {
            panic!("wrong kind");
        };
        assert_eq!(rule.pattern, "main");
        assert_eq!(rule.attributes.enforce_admins, Some(true));
        assert_eq!(rule.attributes.required_approving_review_count, Some(2));
        assert_eq!(rule.state_index(), "example:main");
    }
}
