//! Directory adapter seam
//!
//! The live directory is the authoritative external system. Pagination, auth
//! and retry live entirely in the adapter behind this trait; the catalog only
//! consumes fully materialized record lists. Role and permission fields stay
//! raw strings here so extraction can reject values the model cannot
//! represent instead of the adapter guessing.

use async_trait::async_trait;

use crate::error::Result;
use crate::resource::{
    BranchProtectionAttributes, FileAttributes, RepositoryAttributes,
};

#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub username: String,
    pub role: String,
}

/// A pending organization invitation. Folded into member extraction so an
/// invited user is tracked before the invitation is accepted.
#[derive(Debug, Clone)]
pub struct InvitationRecord {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct RepositoryRecord {
    pub name: String,
    pub attributes: RepositoryAttributes,
}

#[derive(Debug, Clone)]
pub struct TeamRecord {
    pub name: String,
    pub description: Option<String>,
    pub privacy: String,
}

#[derive(Debug, Clone)]
pub struct CollaboratorRecord {
    pub username: String,
    pub permission: String,
}

#[derive(Debug, Clone)]
pub struct RepositoryTeamRecord {
    pub team: String,
    pub permission: String,
}

#[derive(Debug, Clone)]
pub struct TeamMemberRecord {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub attributes: FileAttributes,
}

#[derive(Debug, Clone)]
pub struct LabelRecord {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BranchProtectionRecord {
    pub pattern: String,
    pub attributes: BranchProtectionAttributes,
}

#[derive(Debug, Clone)]
pub struct RulesetRecord {
    pub name: String,
    pub enforcement: String,
    pub target: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Read-only view of the live directory, one enumeration per kind family.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn members(&self) -> Result<Vec<MemberRecord>>;

    async fn invitations(&self) -> Result<Vec<InvitationRecord>>;

    async fn repositories(&self) -> Result<Vec<RepositoryRecord>>;

    async fn teams(&self) -> Result<Vec<TeamRecord>>;

    async fn collaborators(&self, repository: &str) -> Result<Vec<CollaboratorRecord>>;

    async fn repository_teams(&self, repository: &str) -> Result<Vec<RepositoryTeamRecord>>;

    async fn team_members(&self, team: &str) -> Result<Vec<TeamMemberRecord>>;

    async fn labels(&self, repository: &str) -> Result<Vec<LabelRecord>>;

    async fn branch_protection(&self, repository: &str) -> Result<Vec<BranchProtectionRecord>>;

    async fn rulesets(&self) -> Result<Vec<RulesetRecord>>;

    async fn repository_rulesets(&self, repository: &str) -> Result<Vec<RulesetRecord>>;

    /// Point lookup for a single tracked file. Files cannot be enumerated
    /// wholesale; only already-known paths are queried.
    async fn repository_file(&self, repository: &str, path: &str) -> Result<Option<FileRecord>>;
}
