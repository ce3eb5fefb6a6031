//! Path addressing and traversal
//!
//! Paths address nodes as a sequence of mapping keys and sequence indices.
//! `ensure_in` creates missing intermediate containers, which is what lets a
//! child resource be written before its parent container exists.

use std::fmt;

use crate::error::{Error, Result};
use crate::node::{Node, NodeValue};

/// A segment of a path - either a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A path into the document tree.
pub type Path = Vec<PathSegment>;

/// Render a path as `members.admin[0]` for logs and errors.
pub fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Get the node at `path`, or `None` if any step is missing.
pub fn get_in<'a>(node: &'a Node, path: &[PathSegment]) -> Option<&'a Node> {
    let mut current = node;
    for segment in path {
        current = match segment {
            PathSegment::Key(key) => current.get(key)?,
            PathSegment::Index(index) => current.as_sequence()?.get(*index)?,
        };
    }
    Some(current)
}

/// Mutable variant of [`get_in`].
pub fn get_in_mut<'a>(node: &'a mut Node, path: &[PathSegment]) -> Option<&'a mut Node> {
    let mut current = node;
    for segment in path {
        current = match segment {
            PathSegment::Key(key) => {
                let entries = current.as_mapping_mut()?;
                let position = entries.iter().position(|(k, _)| k == key)?;
                &mut entries[position].1
            }
            PathSegment::Index(index) => current.as_sequence_mut()?.get_mut(*index)?,
        };
    }
    Some(current)
}

/// Walk to the node at `path`, creating missing containers on the way.
///
/// A null node is upgraded to whatever container the next segment needs; a
/// sequence index equal to the current length appends a placeholder. Any
/// other shape conflict is a `StructuralMismatch`.
pub fn ensure_in<'a>(node: &'a mut Node, path: &[PathSegment]) -> Result<&'a mut Node> {
    let mut current = node;
    for (pos, segment) in path.iter().enumerate() {
        match segment {
            PathSegment::Key(key) => {
                if current.is_null() {
                    current.value = NodeValue::Mapping(Vec::new());
                }
                let found = current.value.kind_name();
                let Some(entries) = current.as_mapping_mut() else {
                    return Err(Error::structural(
                        render_path(&path[..=pos]),
                        "mapping",
                        found,
                    ));
                };
                let position = match entries.iter().position(|(k, _)| k == key) {
                    Some(position) => position,
                    None => {
                        entries.push((key.clone(), Node::null()));
                        entries.len() - 1
                    }
                };
                current = &mut entries[position].1;
            }
            PathSegment::Index(index) => {
                if current.is_null() {
                    current.value = NodeValue::Sequence(Vec::new());
                }
                let found = current.value.kind_name();
                let Some(items) = current.as_sequence_mut() else {
                    return Err(Error::structural(
                        render_path(&path[..=pos]),
                        "sequence",
                        found,
                    ));
                };
                if *index == items.len() {
                    items.push(Node::null());
                }
                let len = items.len();
                let Some(item) = items.get_mut(*index) else {
                    return Err(Error::IndexOutOfRange {
                        path: render_path(&path[..=pos]),
                        index: *index,
                        len,
                    });
                };
                current = item;
            }
        }
    }
    Ok(current)
}

/// Remove and return the node at `path`, if present.
pub fn delete_in(node: &mut Node, path: &[PathSegment]) -> Option<Node> {
    let (last, parents) = path.split_last()?;
    let parent = get_in_mut(node, parents)?;
    match (&mut parent.value, last) {
        (NodeValue::Mapping(entries), PathSegment::Key(key)) => {
            let position = entries.iter().position(|(k, _)| k == key)?;
            Some(entries.remove(position).1)
        }
        (NodeValue::Sequence(items), PathSegment::Index(index)) if *index < items.len() => {
            Some(items.remove(*index))
        }
        _ => None,
    }
}
