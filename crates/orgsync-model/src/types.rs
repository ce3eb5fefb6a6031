//! The resource catalog's closed kind set and its typed value enums
//!
//! Every enum here fails `FromStr` with an [`Error::UnrepresentableValue`]
//! rather than silently dropping an unknown value: a role the model cannot
//! express must surface immediately or state drifts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The closed set of resource kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Member,
    Repository,
    Team,
    RepositoryCollaborator,
    RepositoryTeam,
    TeamMember,
    RepositoryFile,
    RepositoryLabel,
    RepositoryBranchProtectionRule,
    Ruleset,
    RepositoryRuleset,
}

impl ResourceType {
    /// Catalog order. Kinds are always processed in this order, parents
    /// before their dependent kinds.
    pub const ALL: [ResourceType; 11] = [
        ResourceType::Member,
        ResourceType::Repository,
        ResourceType::Team,
        ResourceType::RepositoryCollaborator,
        ResourceType::RepositoryTeam,
        ResourceType::TeamMember,
        ResourceType::RepositoryFile,
        ResourceType::RepositoryLabel,
        ResourceType::RepositoryBranchProtectionRule,
        ResourceType::Ruleset,
        ResourceType::RepositoryRuleset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Member => "member",
            ResourceType::Repository => "repository",
            ResourceType::Team => "team",
            ResourceType::RepositoryCollaborator => "repository_collaborator",
            ResourceType::RepositoryTeam => "repository_team",
            ResourceType::TeamMember => "team_member",
            ResourceType::RepositoryFile => "repository_file",
            ResourceType::RepositoryLabel => "repository_label",
            ResourceType::RepositoryBranchProtectionRule => "repository_branch_protection_rule",
            ResourceType::Ruleset => "ruleset",
            ResourceType::RepositoryRuleset => "repository_ruleset",
        }
    }

    /// The tracked-state type string this kind is stored under.
    pub fn state_type(&self) -> &'static str {
        match self {
            ResourceType::Member => "github_membership",
            ResourceType::Repository => "github_repository",
            ResourceType::Team => "github_team",
            ResourceType::RepositoryCollaborator => "github_repository_collaborator",
            ResourceType::RepositoryTeam => "github_team_repository",
            ResourceType::TeamMember => "github_team_membership",
            ResourceType::RepositoryFile => "github_repository_file",
            ResourceType::RepositoryLabel => "github_issue_label",
            ResourceType::RepositoryBranchProtectionRule => "github_branch_protection",
            ResourceType::Ruleset => "github_organization_ruleset",
            ResourceType::RepositoryRuleset => "github_repository_ruleset",
        }
    }

    pub fn from_state_type(state_type: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.state_type() == state_type)
            .ok_or_else(|| Error::UnsupportedResourceType {
                name: state_type.to_string(),
            })
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::UnsupportedResourceType {
                name: s.to_string(),
            })
    }
}

/// Organization membership role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    // Pending invitations report the plain role as "direct_member".
    #[serde(alias = "direct_member")]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

impl FromStr for MemberRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(MemberRole::Admin),
            "member" | "direct_member" => Ok(MemberRole::Member),
            other => Err(Error::unrepresentable("member role", other)),
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a member within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Maintainer,
    Member,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Maintainer => "maintainer",
            TeamRole::Member => "member",
        }
    }
}

impl FromStr for TeamRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "maintainer" => Ok(TeamRole::Maintainer),
            "member" => Ok(TeamRole::Member),
            other => Err(Error::unrepresentable("team role", other)),
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission level granted on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryPermission {
    Admin,
    Maintain,
    Push,
    Triage,
    Pull,
}

impl RepositoryPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryPermission::Admin => "admin",
            RepositoryPermission::Maintain => "maintain",
            RepositoryPermission::Push => "push",
            RepositoryPermission::Triage => "triage",
            RepositoryPermission::Pull => "pull",
        }
    }
}

impl FromStr for RepositoryPermission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(RepositoryPermission::Admin),
            "maintain" => Ok(RepositoryPermission::Maintain),
            "push" => Ok(RepositoryPermission::Push),
            "triage" => Ok(RepositoryPermission::Triage),
            "pull" => Ok(RepositoryPermission::Pull),
            other => Err(Error::unrepresentable("repository permission", other)),
        }
    }
}

impl fmt::Display for RepositoryPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamPrivacy {
    Closed,
    Secret,
}

impl TeamPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamPrivacy::Closed => "closed",
            TeamPrivacy::Secret => "secret",
        }
    }
}

impl FromStr for TeamPrivacy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "closed" => Ok(TeamPrivacy::Closed),
            "secret" => Ok(TeamPrivacy::Secret),
            other => Err(Error::unrepresentable("team privacy", other)),
        }
    }
}

impl fmt::Display for TeamPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ruleset enforcement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetEnforcement {
    Active,
    Evaluate,
    Disabled,
}

impl RulesetEnforcement {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetEnforcement::Active => "active",
            RulesetEnforcement::Evaluate => "evaluate",
            RulesetEnforcement::Disabled => "disabled",
        }
    }
}

impl FromStr for RulesetEnforcement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(RulesetEnforcement::Active),
            "evaluate" => Ok(RulesetEnforcement::Evaluate),
            "disabled" => Ok(RulesetEnforcement::Disabled),
            other => Err(Error::unrepresentable("ruleset enforcement", other)),
        }
    }
}

impl fmt::Display for RulesetEnforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a ruleset targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetTarget {
    Branch,
    Tag,
    Push,
}

impl RulesetTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetTarget::Branch => "branch",
            RulesetTarget::Tag => "tag",
            RulesetTarget::Push => "push",
        }
    }
}

impl FromStr for RulesetTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "branch" => Ok(RulesetTarget::Branch),
            "tag" => Ok(RulesetTarget::Tag),
            "push" => Ok(RulesetTarget::Push),
            other => Err(Error::unrepresentable("ruleset target", other)),
        }
    }
}

impl fmt::Display for RulesetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
