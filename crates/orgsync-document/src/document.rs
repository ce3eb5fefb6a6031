//! Unified Document type

use std::fs;
use std::path::Path as FsPath;

use crate::emit::emit;
use crate::error::Result;
use crate::format::format;
use crate::node::{CommentLine, Node};
use crate::parse::parse;
use crate::path::{self, Path, PathSegment};

/// A parsed config document: the node tree plus any trailing comments, with
/// the original source retained for modification tracking.
#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    trailing: Vec<CommentLine>,
    original_source: String,
}

impl Document {
    /// Parse a document from source text.
    pub fn parse(source: &str) -> Result<Self> {
        let parsed = parse(source)?;
        Ok(Self {
            root: parsed.root,
            trailing: parsed.trailing,
            original_source: source.to_string(),
        })
    }

    /// An empty document (serializes to nothing).
    pub fn empty() -> Self {
        Self {
            root: Node::null(),
            trailing: Vec::new(),
            original_source: String::new(),
        }
    }

    /// Load a document from a file.
    pub fn load(path: &FsPath) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Save the document atomically (write to a temp file, then rename).
    pub fn save(&self, path: &FsPath) -> Result<()> {
        let content = self.to_source();
        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Serialize to the canonical source form.
    pub fn to_source(&self) -> String {
        emit(&self.root, &self.trailing)
    }

    /// Whether serializing now would differ from the source this document
    /// was parsed from.
    pub fn is_modified(&self) -> bool {
        self.to_source() != self.original_source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Get the node at `path`, if present.
    pub fn get_in(&self, segments: &[PathSegment]) -> Option<&Node> {
        path::get_in(&self.root, segments)
    }

    /// Walk to `path`, creating missing containers on the way.
    pub fn ensure_in(&mut self, segments: &[PathSegment]) -> Result<&mut Node> {
        path::ensure_in(&mut self.root, segments)
    }

    /// Remove and return the node at `path`, if present.
    pub fn delete_in(&mut self, segments: &[PathSegment]) -> Option<Node> {
        path::delete_in(&mut self.root, segments)
    }

    /// Prune dead scaffolding and sort for deterministic output. Addresses
    /// in `protected` survive pruning even while empty.
    pub fn format(&mut self, protected: &[Path]) {
        format(&mut self.root, protected);
    }
}
