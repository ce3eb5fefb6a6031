//! End-to-end engine runs against mock directory and state backends

use std::collections::HashMap;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use orgsync_core::{ConfigDocument, Engine, ResourceType, SyncRules, TrackedState};
use orgsync_model::{
    BranchProtectionAttributes, BranchProtectionRecord, CollaboratorRecord, DirectoryClient,
    FileAttributes, FileRecord, InvitationRecord, LabelRecord, MemberRecord, RepositoryAttributes,
    RepositoryRecord, RepositoryTeamRecord, RulesetRecord, StateResource, TeamMemberRecord,
    TeamRecord,
};
use orgsync_state::{Error as StateError, StateBackend};

#[derive(Default, Clone)]
struct MockDirectory {
    members: Vec<MemberRecord>,
    invitations: Vec<InvitationRecord>,
    repositories: Vec<RepositoryRecord>,
    teams: Vec<TeamRecord>,
    collaborators: HashMap<String, Vec<CollaboratorRecord>>,
    repository_teams: HashMap<String, Vec<RepositoryTeamRecord>>,
    team_members: HashMap<String, Vec<TeamMemberRecord>>,
    labels: HashMap<String, Vec<LabelRecord>>,
    branch_protection: HashMap<String, Vec<BranchProtectionRecord>>,
    rulesets: Vec<RulesetRecord>,
    repository_rulesets: HashMap<String, Vec<RulesetRecord>>,
    files: HashMap<(String, String), FileRecord>,
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn members(&self) -> orgsync_model::Result<Vec<MemberRecord>> {
        Ok(self.members.clone())
    }

    async fn invitations(&self) -> orgsync_model::Result<Vec<InvitationRecord>> {
        Ok(self.invitations.clone())
    }

    async fn repositories(&self) -> orgsync_model::Result<Vec<RepositoryRecord>> {
        Ok(self.repositories.clone())
    }

    async fn teams(&self) -> orgsync_model::Result<Vec<TeamRecord>> {
        Ok(self.teams.clone())
    }

    async fn collaborators(
        &self,
        repository: &str,
    ) -> orgsync_model::Result<Vec<CollaboratorRecord>> {
        Ok(self.collaborators.get(repository).cloned().unwrap_or_default())
    }

    async fn repository_teams(
        &self,
        repository: &str,
    ) -> orgsync_model::Result<Vec<RepositoryTeamRecord>> {
        Ok(self
            .repository_teams
            .get(repository)
            .cloned()
            .unwrap_or_default())
    }

    async fn team_members(&self, team: &str) -> orgsync_model::Result<Vec<TeamMemberRecord>> {
        Ok(self.team_members.get(team).cloned().unwrap_or_default())
    }

    async fn labels(&self, repository: &str) -> orgsync_model::Result<Vec<LabelRecord>> {
        Ok(self.labels.get(repository).cloned().unwrap_or_default())
    }

    async fn branch_protection(
        &self,
        repository: &str,
    ) -> orgsync_model::Result<Vec<BranchProtectionRecord>> {
        Ok(self
            .branch_protection
            .get(repository)
            .cloned()
            .unwrap_or_default())
    }

    async fn rulesets(&self) -> orgsync_model::Result<Vec<RulesetRecord>> {
        Ok(self.rulesets.clone())
    }

    async fn repository_rulesets(
        &self,
        repository: &str,
    ) -> orgsync_model::Result<Vec<RulesetRecord>> {
        Ok(self
            .repository_rulesets
            .get(repository)
            .cloned()
            .unwrap_or_default())
    }

    async fn repository_file(
        &self,
        repository: &str,
        path: &str,
    ) -> orgsync_model::Result<Option<FileRecord>> {
        Ok(self
            .files
            .get(&(repository.to_string(), path.to_string()))
            .cloned())
    }
}

/// Ledger mock: `importable` holds the state record each address would carry
/// once imported and refreshed.
#[derive(Default)]
struct MockStateBackend {
    resources: Vec<StateResource>,
    importable: HashMap<String, StateResource>,
}

#[async_trait]
impl StateBackend for MockStateBackend {
    async fn pull(&self) -> orgsync_state::Result<Vec<StateResource>> {
        Ok(self.resources.clone())
    }

    async fn import(&mut self, address: &str, _id: &str) -> orgsync_state::Result<()> {
        let record = self
            .importable
            .get(address)
            .cloned()
            .ok_or_else(|| StateError::backend("import", address, "nothing to import"))?;
        self.resources.push(record);
        Ok(())
    }

    async fn remove(&mut self, address: &str) -> orgsync_state::Result<()> {
        self.resources.retain(|r| r.address() != address);
        Ok(())
    }

    async fn refresh(&mut self) -> orgsync_state::Result<()> {
        Ok(())
    }
}

impl MockStateBackend {
    fn with_importable(records: Vec<StateResource>) -> Self {
        Self {
            resources: Vec::new(),
            importable: records
                .into_iter()
                .map(|record| (record.address(), record))
                .collect(),
        }
    }
}

fn state(state_type: &str, index: &str, values: Value) -> StateResource {
    StateResource::new(state_type, index, values)
}

async fn engine(directory: MockDirectory, backend: MockStateBackend, rules: SyncRules) -> Engine {
    let store = TrackedState::load(Box::new(backend), rules).await.unwrap();
    Engine::new(Box::new(directory), store)
}

fn sample_directory() -> MockDirectory {
    MockDirectory {
        members: vec![
            MemberRecord {
                username: "alice".to_string(),
                role: "admin".to_string(),
            },
            MemberRecord {
                username: "bob".to_string(),
                role: "member".to_string(),
            },
        ],
        invitations: vec![InvitationRecord {
            username: "carol".to_string(),
            role: "direct_member".to_string(),
        }],
        repositories: vec![RepositoryRecord {
            name: "example".to_string(),
            attributes: RepositoryAttributes {
                description: Some("demo".to_string()),
                ..Default::default()
            },
        }],
        teams: vec![TeamRecord {
            name: "core".to_string(),
            description: None,
            privacy: "closed".to_string(),
        }],
        collaborators: HashMap::from([(
            "example".to_string(),
            vec![CollaboratorRecord {
                username: "dave".to_string(),
                permission: "push".to_string(),
            }],
        )]),
        team_members: HashMap::from([(
            "core".to_string(),
            vec![TeamMemberRecord {
                username: "alice".to_string(),
                role: "maintainer".to_string(),
            }],
        )]),
        labels: HashMap::from([(
            "example".to_string(),
            vec![LabelRecord {
                name: "bug".to_string(),
                color: Some("d73a4a".to_string()),
                description: None,
            }],
        )]),
        branch_protection: HashMap::from([(
            "example".to_string(),
            vec![BranchProtectionRecord {
                pattern: "main".to_string(),
                attributes: BranchProtectionAttributes {
                    enforce_admins: Some(true),
                    ..Default::default()
                },
            }],
        )]),
        rulesets: vec![RulesetRecord {
            name: "default".to_string(),
            enforcement: "active".to_string(),
            target: "branch".to_string(),
            include: vec!["main".to_string()],
            exclude: Vec::new(),
        }],
        ..Default::default()
    }
}

fn sample_state_records() -> Vec<StateResource> {
    vec![
        state("github_membership", "alice", json!({"username": "alice", "role": "admin"})),
        state("github_membership", "bob", json!({"username": "bob", "role": "member"})),
        state("github_membership", "carol", json!({"username": "carol", "role": "member"})),
        state(
            "github_repository",
            "example",
            json!({"name": "example", "description": "demo"}),
        ),
        state("github_team", "core", json!({"name": "core", "privacy": "closed"})),
        state(
            "github_repository_collaborator",
            "example:dave",
            json!({"repository": "example", "username": "dave", "permission": "push"}),
        ),
        state(
            "github_team_membership",
            "core:alice",
            json!({"team": "core", "username": "alice", "role": "maintainer"}),
        ),
        state(
            "github_issue_label",
            "example:bug",
            json!({"repository": "example", "name": "bug", "color": "d73a4a"}),
        ),
        state(
            "github_branch_protection",
            "example:main",
            json!({"repository": "example", "pattern": "main", "enforce_admins": true}),
        ),
        state(
            "github_organization_ruleset",
            "default",
            json!({"name": "default", "enforcement": "active", "target": "branch", "include": ["main"]}),
        ),
    ]
}

#[tokio::test]
async fn full_run_populates_state_and_document() {
    let backend = MockStateBackend::with_importable(sample_state_records());
    let mut engine = engine(sample_directory(), backend, SyncRules::manage_all()).await;

    let mut config = ConfigDocument::empty();
    let report = engine.run(&mut config).await.unwrap();

    assert_eq!(report.desired, 10);
    assert_eq!(report.imported, 10);
    assert_eq!(report.removed, 0);
    assert_eq!(report.state_errors, 0);
    assert!(report.document_changed);

    let source = config.to_source();
    assert!(source.contains("- \"carol\""), "invitation folded in:\n{source}");
    assert!(source.contains("description: \"demo\""));
    assert!(source.contains("enforce_admins: true"));
    assert!(source.contains("rulesets:"));
    assert_eq!(config.resources(ResourceType::Member).unwrap().len(), 3);
    assert_eq!(
        config
            .resources(ResourceType::RepositoryCollaborator)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let backend = MockStateBackend::with_importable(sample_state_records());
    let mut engine = engine(sample_directory(), backend, SyncRules::manage_all()).await;

    let mut config = ConfigDocument::empty();
    engine.run(&mut config).await.unwrap();
    let settled = config.to_source();

    let mut config = ConfigDocument::parse(&settled).unwrap();
    let report = engine.run(&mut config).await.unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.removed, 0);
    assert!(!report.document_changed);
    assert_eq!(config.to_source(), settled);
}

#[tokio::test]
async fn settled_run_preserves_comments_byte_for_byte() {
    let source = "\
# reviewed quarterly
members:
  admin:
    - \"alice\" # founder
repositories:
  example:
    description: \"demo\"
";
    let directory = MockDirectory {
        members: vec![MemberRecord {
            username: "alice".to_string(),
            role: "admin".to_string(),
        }],
        repositories: vec![RepositoryRecord {
            name: "example".to_string(),
            attributes: RepositoryAttributes {
                description: Some("demo".to_string()),
                ..Default::default()
            },
        }],
        ..Default::default()
    };
    let backend = MockStateBackend {
        resources: vec![
            state("github_membership", "alice", json!({"username": "alice", "role": "admin"})),
            state(
                "github_repository",
                "example",
                json!({"name": "example", "description": "demo"}),
            ),
        ],
        importable: HashMap::new(),
    };
    let mut engine = engine(directory, backend, SyncRules::manage_all()).await;

    let mut config = ConfigDocument::parse(source).unwrap();
    let report = engine.run(&mut config).await.unwrap();

    assert!(!report.document_changed);
    assert_eq!(config.to_source(), source);
}

#[tokio::test]
async fn unmanaged_kinds_are_not_touched() {
    let rules: SyncRules = serde_yaml::from_str("managed:\n  - member\n").unwrap();
    let directory = MockDirectory {
        members: vec![MemberRecord {
            username: "alice".to_string(),
            role: "admin".to_string(),
        }],
        ..Default::default()
    };
    let backend = MockStateBackend::with_importable(vec![state(
        "github_membership",
        "alice",
        json!({"username": "alice", "role": "admin"}),
    )]);
    let mut engine = engine(directory, backend, rules).await;

    let mut config = ConfigDocument::parse(
        "repositories:\n  untracked:\n    description: \"hands off\"\n",
    )
    .unwrap();
    engine.run(&mut config).await.unwrap();

    let source = config.to_source();
    assert!(source.contains("description: \"hands off\""));
    assert!(source.contains("- \"alice\""));
}

#[tokio::test]
async fn formatting_keeps_empty_entries_of_unmanaged_kinds() {
    let rules: SyncRules = serde_yaml::from_str("managed:\n  - member\n").unwrap();
    let directory = MockDirectory {
        members: vec![MemberRecord {
            username: "alice".to_string(),
            role: "admin".to_string(),
        }],
        ..Default::default()
    };
    let backend = MockStateBackend::with_importable(vec![state(
        "github_membership",
        "alice",
        json!({"username": "alice", "role": "admin"}),
    )]);
    let mut engine = engine(directory, backend, rules).await;

    // a hand-written repository with no attributes yet
    let mut config = ConfigDocument::parse("repositories:\n  bare:\n").unwrap();
    engine.run(&mut config).await.unwrap();

    let source = config.to_source();
    assert!(source.contains("bare:"), "empty unmanaged entry lost:\n{source}");
    assert!(source.contains("- \"alice\""));
}

#[tokio::test]
async fn ignored_attributes_never_reach_the_document() {
    let rules: SyncRules = serde_yaml::from_str(
        "managed:\n  - repository\nignored_attributes:\n  repository:\n    - topics\n",
    )
    .unwrap();
    let directory = MockDirectory {
        repositories: vec![RepositoryRecord {
            name: "example".to_string(),
            attributes: RepositoryAttributes {
                description: Some("demo".to_string()),
                topics: Some(vec!["internal".to_string()]),
                ..Default::default()
            },
        }],
        ..Default::default()
    };
    let backend = MockStateBackend::with_importable(vec![state(
        "github_repository",
        "example",
        json!({"name": "example", "description": "demo", "topics": ["internal"]}),
    )]);
    let mut engine = engine(directory, backend, rules).await;

    let mut config = ConfigDocument::empty();
    engine.run(&mut config).await.unwrap();

    let source = config.to_source();
    assert!(source.contains("description: \"demo\""));
    assert!(!source.contains("topics"));
}

#[tokio::test]
async fn file_lookups_narrow_to_tracked_paths() {
    let mut directory = MockDirectory {
        repositories: vec![RepositoryRecord {
            name: "example".to_string(),
            attributes: RepositoryAttributes::default(),
        }],
        ..Default::default()
    };
    directory.files.insert(
        ("example".to_string(), "README.md".to_string()),
        FileRecord {
            attributes: FileAttributes {
                content: Some("fresh".to_string()),
                branch: None,
            },
        },
    );
    // present in the directory but not under management: never picked up
    directory.files.insert(
        ("example".to_string(), "UNTRACKED.md".to_string()),
        FileRecord {
            attributes: FileAttributes {
                content: Some("ignored".to_string()),
                branch: None,
            },
        },
    );
    let backend = MockStateBackend::with_importable(vec![
        state("github_repository", "example", json!({"name": "example"})),
        state(
            "github_repository_file",
            "example/README.md",
            json!({"repository": "example", "path": "README.md", "content": "fresh"}),
        ),
    ]);
    let mut engine = engine(directory, backend, SyncRules::manage_all()).await;

    let mut config = ConfigDocument::parse(
        "repositories:\n  example:\n    files:\n      README.md:\n        content: \"old\"\n",
    )
    .unwrap();
    engine.run(&mut config).await.unwrap();

    let source = config.to_source();
    assert!(source.contains("content: \"fresh\""));
    assert!(!source.contains("UNTRACKED.md"));
}

#[tokio::test]
async fn resources_gone_from_the_directory_are_untracked_and_removed() {
    let directory = MockDirectory {
        members: vec![MemberRecord {
            username: "alice".to_string(),
            role: "admin".to_string(),
        }],
        ..Default::default()
    };
    let backend = MockStateBackend {
        resources: vec![
            state("github_membership", "alice", json!({"username": "alice", "role": "admin"})),
            state("github_membership", "bob", json!({"username": "bob", "role": "member"})),
        ],
        importable: HashMap::new(),
    };
    let mut engine = engine(directory, backend, SyncRules::manage_all()).await;

    let mut config = ConfigDocument::parse(
        "members:\n  admin:\n    - \"alice\"\n  member:\n    - \"bob\"\n",
    )
    .unwrap();
    let report = engine.run(&mut config).await.unwrap();

    assert_eq!(report.removed, 1);
    let members = config.resources(ResourceType::Member).unwrap();
    assert_eq!(members.len(), 1);
    assert!(!config.to_source().contains("bob"));
}
