//! Block-style YAML parser for the config document subset
//!
//! The subset covers what the config file actually uses: nested mappings,
//! `- ` sequences of scalars (or of indented blocks), double-quoted strings,
//! plain null/bool/integer scalars, full-line comments and inline comments.
//! Flow collections, anchors, block scalars and multi-document streams are
//! rejected with a parse error carrying the offending line number.

use crate::error::{Error, Result};
use crate::node::{CommentLine, Node, NodeValue, Scalar};

#[derive(Debug)]
pub(crate) struct Parsed {
    pub root: Node,
    pub trailing: Vec<CommentLine>,
}

pub(crate) fn parse(source: &str) -> Result<Parsed> {
    let lines = scan(source)?;
    let mut parser = Parser {
        lines,
        pos: 0,
        carry: Vec::new(),
    };
    let root = parser.parse_block(0)?;
    parser.skip_comments();
    if let Some(line) = parser.lines.get(parser.pos) {
        return Err(Error::parse(line.number, "unexpected content after document"));
    }
    Ok(Parsed {
        root,
        trailing: std::mem::take(&mut parser.carry),
    })
}

#[derive(Debug)]
struct Line {
    number: usize,
    indent: usize,
    kind: LineKind,
}

#[derive(Debug)]
enum LineKind {
    Blank,
    Comment(String),
    Content { text: String, inline: Option<String> },
}

/// Split the source into classified lines, separating inline comments.
fn scan(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let number = i + 1;
        if raw.trim().is_empty() {
            lines.push(Line {
                number,
                indent: 0,
                kind: LineKind::Blank,
            });
            continue;
        }
        let indent = raw.len() - raw.trim_start_matches(' ').len();
        let rest = &raw[indent..];
        if rest.starts_with('\t') {
            return Err(Error::parse(number, "tab indentation is not supported"));
        }
        if let Some(comment) = rest.strip_prefix('#') {
            lines.push(Line {
                number,
                indent,
                kind: LineKind::Comment(comment.to_string()),
            });
            continue;
        }
        let (text, inline) = split_inline_comment(rest);
        lines.push(Line {
            number,
            indent,
            kind: LineKind::Content {
                text: text.trim_end().to_string(),
                inline,
            },
        });
    }
    Ok(lines)
}

/// Find an inline `#` comment outside of a double-quoted string. The `#`
/// must follow whitespace to count as a comment.
fn split_inline_comment(rest: &str) -> (&str, Option<String>) {
    let mut in_string = false;
    let mut escaped = false;
    let mut previous_is_space = false;
    for (idx, ch) in rest.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if ch == '#' && previous_is_space {
            return (&rest[..idx], Some(rest[idx + 1..].to_string()));
        }
        previous_is_space = ch.is_whitespace();
    }
    (rest, None)
}

struct Parser {
    lines: Vec<Line>,
    pos: usize,
    /// Comment lines consumed while looking for the next content line. They
    /// attach to whatever node is parsed next, or become the document's
    /// trailing comments.
    carry: Vec<CommentLine>,
}

impl Parser {
    fn skip_comments(&mut self) {
        while let Some(line) = self.lines.get(self.pos) {
            match &line.kind {
                LineKind::Blank => self.carry.push(CommentLine::Blank),
                LineKind::Comment(text) => self.carry.push(CommentLine::Text(text.clone())),
                LineKind::Content { .. } => break,
            }
            self.pos += 1;
        }
    }

    fn take_carry(&mut self) -> Vec<CommentLine> {
        std::mem::take(&mut self.carry)
    }

    /// Peek the next content line, returning `(indent, text)` without
    /// consuming it.
    fn peek_content(&mut self) -> Option<(usize, &str)> {
        self.skip_comments();
        match self.lines.get(self.pos) {
            Some(Line {
                indent,
                kind: LineKind::Content { text, .. },
                ..
            }) => Some((*indent, text.as_str())),
            _ => None,
        }
    }

    /// Parse the block starting at the next content line, provided it is
    /// indented at least `min_indent`. Returns a null node for an empty block.
    fn parse_block(&mut self, min_indent: usize) -> Result<Node> {
        let Some((indent, text)) = self.peek_content() else {
            return Ok(Node::null());
        };
        if indent < min_indent {
            return Ok(Node::null());
        }
        if is_sequence_item(text) {
            self.parse_sequence(indent)
        } else if split_entry(text).is_some() {
            self.parse_mapping(indent)
        } else {
            self.parse_scalar_line()
        }
    }

    fn parse_scalar_line(&mut self) -> Result<Node> {
        let comment_before = self.take_carry();
        let Some(Line {
            number,
            kind: LineKind::Content { text, inline },
            ..
        }) = self.lines.get(self.pos)
        else {
            return Ok(Node::null());
        };
        let mut node = Node::scalar(parse_scalar(text, *number)?);
        node.comment_before = comment_before;
        node.comment = inline.clone();
        self.pos += 1;
        Ok(node)
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node> {
        let mut entries: Vec<(String, Node)> = Vec::new();
        loop {
            let Some((line_indent, _)) = self.peek_content() else {
                break;
            };
            if line_indent < indent {
                break;
            }
            let Some(Line {
                number,
                kind: LineKind::Content { text, inline },
                ..
            }) = self.lines.get(self.pos)
            else {
                break;
            };
            let number = *number;
            if line_indent > indent {
                return Err(Error::parse(number, "unexpected indent"));
            }
            let Some((key, rest)) = split_entry(text) else {
                return Err(Error::parse(number, "expected a `key:` entry"));
            };
            let key = unquote_key(&key, number)?;
            let rest = rest.to_string();
            let inline = inline.clone();
            let comment_before = self.take_carry();
            self.pos += 1;

            let mut value = if rest.is_empty() {
                // A sequence may sit at the same indent as its key.
                match self.peek_content() {
                    Some((child_indent, child_text))
                        if child_indent == indent && is_sequence_item(child_text) =>
                    {
                        self.parse_sequence(indent)?
                    }
                    _ => self.parse_block(indent + 1)?,
                }
            } else {
                Node::scalar(parse_scalar(&rest, number)?)
            };

            attach_comments(&mut value, comment_before, inline);
            if entries.iter().any(|(existing, _)| existing == &key) {
                return Err(Error::parse(number, format!("duplicate key {key:?}")));
            }
            entries.push((key, value));
        }
        Ok(Node::new(NodeValue::Mapping(entries)))
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node> {
        let mut items = Vec::new();
        loop {
            let Some((line_indent, text)) = self.peek_content() else {
                break;
            };
            if line_indent < indent || !is_sequence_item(text) {
                break;
            }
            let Some(Line {
                number,
                kind: LineKind::Content { text, inline },
                ..
            }) = self.lines.get(self.pos)
            else {
                break;
            };
            let number = *number;
            if line_indent > indent {
                return Err(Error::parse(number, "unexpected indent"));
            }
            let rest = text[1..].trim_start().to_string();
            let inline = inline.clone();
            let comment_before = self.take_carry();
            self.pos += 1;

            let mut value = if rest.is_empty() {
                self.parse_block(indent + 1)?
            } else if split_entry(&rest).is_some() {
                return Err(Error::parse(
                    number,
                    "inline mappings in sequence items are not supported",
                ));
            } else {
                Node::scalar(parse_scalar(&rest, number)?)
            };

            attach_comments(&mut value, comment_before, inline);
            items.push(value);
        }
        Ok(Node::new(NodeValue::Sequence(items)))
    }
}

/// Prepend outer comments to whatever the inner parse attached, and set the
/// inline comment when the node has none of its own.
fn attach_comments(node: &mut Node, mut comment_before: Vec<CommentLine>, inline: Option<String>) {
    comment_before.append(&mut node.comment_before);
    node.comment_before = comment_before;
    if node.comment.is_none() {
        node.comment = inline;
    }
}

fn is_sequence_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// Split `key: rest`. Returns the raw (possibly quoted) key and the trimmed
/// remainder. A colon only separates when followed by a space or end of line,
/// so plain scalars like `https://example.com` stay whole.
fn split_entry(text: &str) -> Option<(String, &str)> {
    if let Some(stripped) = text.strip_prefix('"') {
        let (_, consumed) = read_quoted(stripped).ok()?;
        let after = &stripped[consumed..];
        let after = after.strip_prefix(':')?;
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        let key = &text[..consumed + 1];
        return Some((key.to_string(), after.trim_start()));
    }
    for (idx, ch) in text.char_indices() {
        if ch == ':' {
            let after = &text[idx + 1..];
            if after.is_empty() || after.starts_with(' ') {
                let key = text[..idx].trim_end();
                if key.is_empty() {
                    return None;
                }
                return Some((key.to_string(), after.trim_start()));
            }
        }
    }
    None
}

fn unquote_key(key: &str, line: usize) -> Result<String> {
    if let Some(stripped) = key.strip_prefix('"') {
        let (unquoted, consumed) =
            read_quoted(stripped).map_err(|message| Error::parse(line, message))?;
        if consumed != stripped.len() {
            return Err(Error::parse(line, "trailing characters after quoted key"));
        }
        Ok(unquoted)
    } else {
        Ok(key.to_string())
    }
}

fn parse_scalar(text: &str, line: usize) -> Result<Scalar> {
    if let Some(stripped) = text.strip_prefix('"') {
        let (value, consumed) =
            read_quoted(stripped).map_err(|message| Error::parse(line, message))?;
        if consumed != stripped.len() {
            return Err(Error::parse(line, "trailing characters after string"));
        }
        return Ok(Scalar::Str(value));
    }
    if text.starts_with(['[', '{', '&', '*', '|', '>', '\'']) {
        return Err(Error::parse(
            line,
            format!("unsupported YAML syntax: {text:?}"),
        ));
    }
    match text {
        "null" | "~" => Ok(Scalar::Null),
        "true" => Ok(Scalar::Bool(true)),
        "false" => Ok(Scalar::Bool(false)),
        _ => match text.parse::<i64>() {
            Ok(i) => Ok(Scalar::Int(i)),
            Err(_) => Ok(Scalar::Str(text.to_string())),
        },
    }
}

/// Read the body of a double-quoted string (opening quote already consumed).
/// Returns the unescaped value and the number of bytes consumed including the
/// closing quote.
fn read_quoted(body: &str) -> std::result::Result<(String, usize), String> {
    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Ok((value, idx + 1)),
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, other)) => return Err(format!("unsupported escape \\{other}")),
                None => return Err("unterminated escape".to_string()),
            },
            other => value.push(other),
        }
    }
    Err("unterminated string".to_string())
}
