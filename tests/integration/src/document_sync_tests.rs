//! Config document sync properties
//!
//! Document-level behavior of the resource-aware sync: idempotence, kind
//! closure, comment preservation, the destructive-removal flag, address
//! determinism, and the removal-cascade scenarios.

use orgsync_document::PathSegment;
use orgsync_model::{
    BranchProtectionAttributes, BranchProtectionRule, ConfigDocument, Member, MemberRole,
    Repository, RepositoryAttributes, RepositoryCollaborator, RepositoryPermission, Resource,
    ResourceType,
};
use pretty_assertions::assert_eq;

fn member(username: &str, role: MemberRole) -> Resource {
    Resource::Member(Member {
        username: username.to_string(),
        role,
    })
}

fn repository(name: &str, description: Option<&str>) -> Resource {
    Resource::Repository(Repository {
        name: name.to_string(),
        attributes: RepositoryAttributes {
            description: description.map(str::to_string),
            ..Default::default()
        },
    })
}

fn collaborator(repo: &str, username: &str, permission: RepositoryPermission) -> Resource {
    Resource::RepositoryCollaborator(RepositoryCollaborator {
        repository: repo.to_string(),
        username: username.to_string(),
        permission,
    })
}

fn protection(repo: &str, pattern: &str) -> Resource {
    Resource::RepositoryBranchProtectionRule(BranchProtectionRule {
        repository: repo.to_string(),
        pattern: pattern.to_string(),
        attributes: BranchProtectionAttributes {
            enforce_admins: Some(true),
            ..Default::default()
        },
    })
}

#[test]
fn sync_is_idempotent_on_serialized_form() {
    let mut config = ConfigDocument::parse(
        "\
# reviewed 2026-06
members:
  admin:
    - \"alice\" # founder
repositories:
  example:
    description: \"kept\"
",
    )
    .unwrap();
    let desired = vec![
        member("alice", MemberRole::Admin),
        member("bob", MemberRole::Member),
        repository("example", Some("kept")),
        collaborator("example", "carol", RepositoryPermission::Push),
    ];
    let types = ResourceType::ALL;

    config.sync(&desired, &types).unwrap();
    config.format(&types).unwrap();
    let first = config.to_source();

    let mut again = ConfigDocument::parse(&first).unwrap();
    again.sync(&desired, &types).unwrap();
    again.format(&types).unwrap();

    assert_eq!(again.to_source(), first);
    // unchanged scalars kept their comments through the first pass
    assert!(first.contains("# founder"));
    assert!(first.starts_with("# reviewed 2026-06\n"));
}

#[test]
fn sync_closes_each_kind_over_the_desired_set() {
    let mut config = ConfigDocument::parse(
        "members:\n  admin:\n    - \"stale\"\nrepositories:\n  gone:\n    description: \"x\"\n",
    )
    .unwrap();
    let desired = vec![
        member("alice", MemberRole::Admin),
        repository("fresh", None),
        protection("fresh", "main"),
    ];
    let types = ResourceType::ALL;
    config.sync(&desired, &types).unwrap();

    for ty in types {
        let present = config.resources(ty).unwrap();
        let expected: Vec<_> = desired
            .iter()
            .filter(|r| r.resource_type() == ty)
            .map(Resource::state_address)
            .collect();
        let found: Vec<_> = present.iter().map(Resource::state_address).collect();
        assert_eq!(found, expected, "kind {ty} not closed");
    }
}

#[test]
fn unchanged_attribute_keeps_comment_changed_attribute_loses_it() {
    let source = "\
repositories:
  example:
    description: \"same\" # do not touch
    has_issues: true # flipped below
";
    let mut config = ConfigDocument::parse(source).unwrap();
    let updated = Resource::Repository(Repository {
        name: "example".to_string(),
        attributes: RepositoryAttributes {
            description: Some("same".to_string()),
            has_issues: Some(false),
            ..Default::default()
        },
    });
    config.add_resource(&updated, true).unwrap();

    let output = config.to_source();
    assert!(output.contains("description: \"same\" # do not touch"));
    assert!(output.contains("has_issues: false"));
    assert!(!output.contains("# flipped below"));
}

#[test]
fn destructive_removal_flag_controls_attribute_deletion() {
    let source = "repositories:\n  example:\n    description: \"d\"\n    has_wiki: true\n";
    let sparse = repository("example", Some("d"));

    let mut keep = ConfigDocument::parse(source).unwrap();
    keep.add_resource(&sparse, false).unwrap();
    assert!(keep.to_source().contains("has_wiki: true"));

    let mut drop = ConfigDocument::parse(source).unwrap();
    drop.add_resource(&sparse, true).unwrap();
    assert!(!drop.to_source().contains("has_wiki"));
}

#[test]
fn config_addresses_are_deterministic() {
    let config =
        ConfigDocument::parse("members:\n  member:\n    - \"alice\"\n    - \"bob\"\n").unwrap();
    let present = member("bob", MemberRole::Member);
    let fresh = member("carol", MemberRole::Member);

    let first = present.config_path(config.document());
    assert_eq!(first, present.config_path(config.document()));
    assert_eq!(first.last(), Some(&PathSegment::Index(1)));

    // a new identity lands on the first unused slot: the list length
    let path = fresh.config_path(config.document());
    assert_eq!(path.last(), Some(&PathSegment::Index(2)));
}

#[test]
fn removing_admins_and_repositories_cascades() {
    let source = "\
members:
  admin:
    - \"alice\"
    - \"bob\"
repositories:
  repo1:
    collaborators:
      push:
        - \"carol\"
    description: \"one\"
  repo2:
    labels:
      bug:
        color: \"d73a4a\"
  repo3:
    branch_protection:
      main:
        enforce_admins: true
  repo4:
  repo5:
  repo6:
  repo7:
";
    let mut config = ConfigDocument::parse(source).unwrap();
    let types = ResourceType::ALL;
    // 2 members, 7 repositories, and one child resource in each of repo1-3
    assert_eq!(config.all_resources(&types).unwrap().len(), 12);

    // keep only repositories 4-7: both admins and repo1-3 go, children included
    let desired: Vec<_> = (4..=7)
        .map(|n| repository(&format!("repo{n}"), None))
        .collect();
    config.sync(&desired, &types).unwrap();

    let remaining = config.all_resources(&types).unwrap();
    assert_eq!(remaining.len(), 4);
    assert!(config.resources(ResourceType::Member).unwrap().is_empty());
    assert!(
        config
            .resources(ResourceType::RepositoryCollaborator)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn container_creation_is_order_independent_through_sync() {
    let types = ResourceType::ALL;
    let mut sources = Vec::new();
    for desired in [
        vec![protection("test", "main"), repository("test", None)],
        vec![repository("test", None), protection("test", "main")],
    ] {
        let mut config = ConfigDocument::empty();
        config.sync(&desired, &types).unwrap();
        config.format(&types).unwrap();
        assert_eq!(config.resources(ResourceType::Repository).unwrap().len(), 1);
        assert_eq!(
            config
                .resources(ResourceType::RepositoryBranchProtectionRule)
                .unwrap()
                .len(),
            1
        );
        sources.push(config.to_source());
    }
    assert_eq!(sources[0], sources[1]);
}

#[test]
fn formatted_output_is_sorted_and_pruned() {
    let mut config = ConfigDocument::empty();
    let desired = vec![
        repository("zeta", None),
        repository("alpha", Some("a")),
        member("bob", MemberRole::Member),
        member("alice", MemberRole::Admin),
    ];
    let types = ResourceType::ALL;
    config.sync(&desired, &types).unwrap();
    config.format(&types).unwrap();

    assert_eq!(
        config.to_source(),
        "\
members:
  admin:
    - \"alice\"
  member:
    - \"bob\"
repositories:
  alpha:
    description: \"a\"
  zeta:
",
    );
}
