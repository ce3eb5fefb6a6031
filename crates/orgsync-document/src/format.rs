//! Canonical formatting pass
//!
//! Pruning runs to a fixed point: null nodes and empty containers are
//! stripped unless their address is protected (a known resource may be
//! momentarily empty and must survive). Mapping keys and sequence items are
//! then sorted for deterministic output. Comments travel with their nodes.

use crate::node::{Node, NodeValue};
use crate::path::{Path, PathSegment};

pub(crate) fn format(root: &mut Node, protected: &[Path]) {
    let mut path = Vec::new();
    while prune(root, &mut path, protected) {}
    sort(root);
}

fn is_protected(parent: &[PathSegment], key: &str, protected: &[Path]) -> bool {
    protected.iter().any(|candidate| {
        candidate.len() == parent.len() + 1
            && candidate[..parent.len()] == *parent
            && matches!(&candidate[parent.len()], PathSegment::Key(k) if k == key)
    })
}

fn prune(node: &mut Node, path: &mut Path, protected: &[Path]) -> bool {
    match &mut node.value {
        NodeValue::Mapping(entries) => {
            let mut changed = false;
            for (key, child) in entries.iter_mut() {
                path.push(PathSegment::Key(key.clone()));
                changed |= prune(child, path, protected);
                path.pop();
            }
            let mut index = 0;
            while index < entries.len() {
                let (key, child) = &entries[index];
                if child.is_removable() && !is_protected(path, key, protected) {
                    tracing::debug!(key = %key, "pruning empty entry");
                    entries.remove(index);
                    changed = true;
                } else {
                    index += 1;
                }
            }
            changed
        }
        NodeValue::Sequence(items) => {
            let mut changed = false;
            for (index, child) in items.iter_mut().enumerate() {
                path.push(PathSegment::Index(index));
                changed |= prune(child, path, protected);
                path.pop();
            }
            let before = items.len();
            items.retain(|item| !item.is_removable());
            changed || items.len() != before
        }
        NodeValue::Scalar(_) => false,
    }
}

fn sort(node: &mut Node) {
    match &mut node.value {
        NodeValue::Mapping(entries) => {
            for (_, child) in entries.iter_mut() {
                sort(child);
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        NodeValue::Sequence(items) => {
            for child in items.iter_mut() {
                sort(child);
            }
            items.sort_by_cached_key(|item| {
                serde_json::to_string(&item.to_value()).unwrap_or_default()
            });
        }
        NodeValue::Scalar(_) => {}
    }
}
