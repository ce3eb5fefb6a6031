//! Structural value application
//!
//! `apply_value` merges a plain desired value into an existing node while
//! leaving everything that did not change byte-for-byte intact, comments
//! included. This is the machinery behind idempotent document updates: an
//! unchanged scalar is never touched, a changed scalar is overwritten and
//! its comments cleared, and removals only happen under an explicit flag.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::node::{Node, NodeValue, Scalar};

/// Merge `desired` into `node`. Returns whether anything changed.
///
/// With `allow_removal` set, mapping keys and trailing sequence items absent
/// from `desired` are deleted; otherwise they are left in place, which
/// supports sparse updates that should not erase fields the source does not
/// know about.
pub fn apply_value(node: &mut Node, desired: &Value, allow_removal: bool) -> Result<bool> {
    apply_at(node, desired, allow_removal, &[], "")
}

/// Like [`apply_value`], but shields the named top-level mapping keys from
/// destructive removal. Used when a resource's attributes share a container
/// with child-resource sections that this application must not disturb.
pub fn apply_value_preserving(
    node: &mut Node,
    desired: &Value,
    allow_removal: bool,
    preserve: &[&str],
) -> Result<bool> {
    apply_at(node, desired, allow_removal, preserve, "")
}

fn child_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn apply_at(
    node: &mut Node,
    desired: &Value,
    allow_removal: bool,
    preserve: &[&str],
    path: &str,
) -> Result<bool> {
    match desired {
        Value::Object(map) => {
            let mut changed = false;
            if node.is_null() {
                node.value = NodeValue::Mapping(Vec::new());
                changed = true;
            }
            let found = node.value.kind_name();
            let Some(entries) = node.as_mapping_mut() else {
                return Err(Error::structural(path.to_string(), "mapping", found));
            };
            for (key, child_desired) in map {
                let location = child_path(path, key);
                match entries.iter_mut().find(|(k, _)| k == key) {
                    Some((_, child)) => {
                        changed |= apply_at(child, child_desired, allow_removal, &[], &location)?;
                    }
                    None => {
                        tracing::debug!(path = %location, "inserting property");
                        entries.push((key.clone(), Node::from_value(child_desired)?));
                        changed = true;
                    }
                }
            }
            if allow_removal {
                let before = entries.len();
                entries.retain(|(key, _)| {
                    let keep = map.contains_key(key) || preserve.contains(&key.as_str());
                    if !keep {
                        tracing::debug!(path = %child_path(path, key), "removing property");
                    }
                    keep
                });
                changed |= entries.len() != before;
            }
            Ok(changed)
        }
        Value::Array(values) => {
            let mut changed = false;
            if node.is_null() {
                node.value = NodeValue::Sequence(Vec::new());
                changed = true;
            }
            let found = node.value.kind_name();
            let Some(items) = node.as_sequence_mut() else {
                return Err(Error::structural(path.to_string(), "sequence", found));
            };
            for (index, child_desired) in values.iter().enumerate() {
                let location = format!("{path}[{index}]");
                if child_desired.is_array() {
                    return Err(Error::NestedSequence { path: location });
                }
                if index < items.len() {
                    changed |=
                        apply_at(&mut items[index], child_desired, allow_removal, &[], &location)?;
                } else {
                    items.push(Node::from_value(child_desired)?);
                    changed = true;
                }
            }
            if allow_removal && items.len() > values.len() {
                items.truncate(values.len());
                changed = true;
            }
            Ok(changed)
        }
        scalar => {
            let desired_scalar = Scalar::from_json(scalar)?;
            let found = node.value.kind_name();
            let Some(current) = node.as_scalar() else {
                return Err(Error::structural(path.to_string(), "scalar", found));
            };
            if *current == desired_scalar {
                return Ok(false);
            }
            tracing::debug!(path = %path, "overwriting scalar");
            node.value = NodeValue::Scalar(desired_scalar);
            node.clear_comments();
            Ok(true)
        }
    }
}
