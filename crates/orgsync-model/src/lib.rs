//! Resource catalog and config document model for orgsync
//!
//! Defines the closed set of resource kinds, their identities and
//! deterministic addresses, extraction from the three representations a
//! resource lives in (live directory, tracked state, config document), and
//! the resource-aware [`ConfigDocument`] operations built on the
//! comment-preserving document engine.

pub mod config;
pub mod directory;
pub mod error;
pub mod resource;
pub mod state;
pub mod types;

pub use config::ConfigDocument;
pub use directory::{
    BranchProtectionRecord, CollaboratorRecord, DirectoryClient, FileRecord, InvitationRecord,
    LabelRecord, MemberRecord, RepositoryRecord, RepositoryTeamRecord, RulesetRecord, TeamMemberRecord,
    TeamRecord,
};
pub use error::{Error, Result};
pub use resource::{
    BranchProtectionAttributes, BranchProtectionRule, FileAttributes, LabelAttributes, Member,
    Repository, RepositoryAttributes, RepositoryCollaborator, RepositoryFile, RepositoryLabel,
    RepositoryRuleset, RepositoryTeam, Resource, Ruleset, RulesetAttributes, Team, TeamAttributes,
    TeamMember,
};
pub use state::{StateResource, render_address};
pub use types::{
    MemberRole, RepositoryPermission, ResourceType, RulesetEnforcement, RulesetTarget, TeamPrivacy,
    TeamRole,
};
