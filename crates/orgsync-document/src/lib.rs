//! Comment-preserving YAML document engine for orgsync
//!
//! The config document is a human-edited file: comments, ordering and
//! annotations in it must survive automated edits. This crate models the
//! document as an explicit node tree where every node owns its surrounding
//! comments, and provides the structural operations the sync layer needs:
//! path addressing with container creation on demand, minimal in-place value
//! application, and a canonicalizing format pass.

pub mod apply;
pub mod document;
mod emit;
pub mod error;
mod format;
pub mod node;
mod parse;
pub mod path;

pub use apply::{apply_value, apply_value_preserving};
pub use document::Document;
pub use error::{Error, Result};
pub use node::{CommentLine, Node, NodeValue, Scalar};
pub use path::{Path, PathSegment, delete_in, ensure_in, get_in, get_in_mut, render_path};
