//! Block-style emitter
//!
//! Serializes the node tree back to the canonical on-disk form: two-space
//! indentation, double-quoted strings, comments re-emitted verbatim. Emitting
//! an already-canonical document and re-parsing it yields the same tree.

use crate::node::{CommentLine, Node, NodeValue, Scalar};

pub(crate) fn emit(root: &Node, trailing: &[CommentLine]) -> String {
    let mut out = String::new();
    emit_comments(&mut out, &root.comment_before, 0);
    match &root.value {
        NodeValue::Scalar(Scalar::Null) => {}
        NodeValue::Scalar(scalar) => {
            out.push_str(&scalar_to_string(scalar));
            emit_inline_comment(&mut out, root.comment.as_deref());
            out.push('\n');
        }
        NodeValue::Mapping(_) | NodeValue::Sequence(_) => emit_block(&mut out, root, 0),
    }
    emit_comments(&mut out, trailing, 0);
    out
}

fn emit_block(out: &mut String, node: &Node, indent: usize) {
    match &node.value {
        NodeValue::Mapping(entries) => {
            for (key, child) in entries {
                emit_comments(out, &child.comment_before, indent);
                push_indent(out, indent);
                out.push_str(&emit_key(key));
                out.push(':');
                match &child.value {
                    NodeValue::Scalar(Scalar::Null) => {
                        emit_inline_comment(out, child.comment.as_deref());
                        out.push('\n');
                    }
                    NodeValue::Scalar(scalar) => {
                        out.push(' ');
                        out.push_str(&scalar_to_string(scalar));
                        emit_inline_comment(out, child.comment.as_deref());
                        out.push('\n');
                    }
                    NodeValue::Mapping(_) | NodeValue::Sequence(_) => {
                        emit_inline_comment(out, child.comment.as_deref());
                        out.push('\n');
                        emit_block(out, child, indent + 2);
                    }
                }
            }
        }
        NodeValue::Sequence(items) => {
            for item in items {
                emit_comments(out, &item.comment_before, indent);
                push_indent(out, indent);
                out.push('-');
                match &item.value {
                    NodeValue::Scalar(scalar) => {
                        out.push(' ');
                        out.push_str(&scalar_to_string(scalar));
                        emit_inline_comment(out, item.comment.as_deref());
                        out.push('\n');
                    }
                    NodeValue::Mapping(_) | NodeValue::Sequence(_) => {
                        emit_inline_comment(out, item.comment.as_deref());
                        out.push('\n');
                        emit_block(out, item, indent + 2);
                    }
                }
            }
        }
        // Empty containers and scalars have no block form; the caller emits
        // them on the key line.
        NodeValue::Scalar(_) => {}
    }
}

fn emit_comments(out: &mut String, comments: &[CommentLine], indent: usize) {
    for comment in comments {
        match comment {
            CommentLine::Blank => out.push('\n'),
            CommentLine::Text(text) => {
                push_indent(out, indent);
                out.push('#');
                out.push_str(text);
                out.push('\n');
            }
        }
    }
}

fn emit_inline_comment(out: &mut String, comment: Option<&str>) {
    if let Some(text) = comment {
        out.push_str(" #");
        out.push_str(text);
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

/// Keys stay plain when they only use identifier-ish characters; everything
/// else is double-quoted.
fn emit_key(key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'));
    if plain {
        key.to_string()
    } else {
        quote_string(key)
    }
}

pub(crate) fn scalar_to_string(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Str(s) => quote_string(s),
    }
}

fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
