//! Node tree with comment annotations
//!
//! Every node carries the comments written around it, so structural edits can
//! re-serialize untouched values together with their annotations. Mappings are
//! ordered pair lists, not hash maps: insertion order is part of the document.

use serde_json::Value;

use crate::error::{Error, Result};

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Scalar {
    /// Convert a plain JSON scalar. Collections and non-integer numbers are
    /// rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => n.as_i64().map(Scalar::Int).ok_or(Error::UnsupportedValue {
                message: format!("non-integer number {n}"),
            }),
            Value::String(s) => Ok(Scalar::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(Error::UnsupportedValue {
                message: "collection where a scalar was expected".to_string(),
            }),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One line of comment material attached before a node.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentLine {
    /// An empty line.
    Blank,
    /// Everything after the `#` marker, verbatim (including leading space).
    Text(String),
}

/// The structural value of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
}

impl NodeValue {
    /// Short shape name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeValue::Scalar(_) => "scalar",
            NodeValue::Mapping(_) => "mapping",
            NodeValue::Sequence(_) => "sequence",
        }
    }
}

/// A document node: a value plus the comments written around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Comment and blank lines preceding this node.
    pub comment_before: Vec<CommentLine>,
    /// Inline comment on the same line as this node's value (or key).
    pub comment: Option<String>,
    pub value: NodeValue,
}

impl Node {
    pub fn new(value: NodeValue) -> Self {
        Self {
            comment_before: Vec::new(),
            comment: None,
            value,
        }
    }

    pub fn null() -> Self {
        Self::new(NodeValue::Scalar(Scalar::Null))
    }

    pub fn scalar(scalar: Scalar) -> Self {
        Self::new(NodeValue::Scalar(scalar))
    }

    pub fn mapping() -> Self {
        Self::new(NodeValue::Mapping(Vec::new()))
    }

    pub fn sequence() -> Self {
        Self::new(NodeValue::Sequence(Vec::new()))
    }

    /// Build a comment-free subtree from a plain JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, child) in map {
                    entries.push((key.clone(), Node::from_value(child)?));
                }
                Ok(Node::new(NodeValue::Mapping(entries)))
            }
            Value::Array(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for child in items {
                    if child.is_array() {
                        return Err(Error::UnsupportedValue {
                            message: "nested sequences are not supported".to_string(),
                        });
                    }
                    nodes.push(Node::from_value(child)?);
                }
                Ok(Node::new(NodeValue::Sequence(nodes)))
            }
            scalar => Ok(Node::scalar(Scalar::from_json(scalar)?)),
        }
    }

    /// Strip comments and convert to a plain JSON value.
    pub fn to_value(&self) -> Value {
        match &self.value {
            NodeValue::Scalar(s) => s.to_json(),
            NodeValue::Mapping(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (key, child) in entries {
                    map.insert(key.clone(), child.to_value());
                }
                Value::Object(map)
            }
            NodeValue::Sequence(items) => {
                Value::Array(items.iter().map(Node::to_value).collect())
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, NodeValue::Scalar(Scalar::Null))
    }

    /// True for nodes the formatter may prune: nulls and empty containers.
    pub fn is_removable(&self) -> bool {
        match &self.value {
            NodeValue::Scalar(Scalar::Null) => true,
            NodeValue::Mapping(entries) => entries.is_empty(),
            NodeValue::Sequence(items) => items.is_empty(),
            NodeValue::Scalar(_) => false,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.value {
            NodeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_mapping(&self) -> Option<&Vec<(String, Node)>> {
        match &self.value {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Vec<(String, Node)>> {
        match &mut self.value {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Node>> {
        match &self.value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.value {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Drop both comment annotations. Called after a scalar overwrite: a
    /// changed value invalidates notes attached to the old one.
    pub fn clear_comments(&mut self) {
        self.comment_before.clear();
        self.comment = None;
    }
}
