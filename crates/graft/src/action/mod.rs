//! Rewrite directives and the positioned actions they produce.
//!
//! Directives are recorded against the current node while a script runs.
//! Once the script returns, the coordinator positions each one: a
//! kind-specific routine reads the node and the surrounding source to
//! compute a byte range and the replacement text, applying the hygiene
//! adjustments in [`hygiene`] where the kind calls for them.

mod deletion;
pub mod hygiene;
mod insertion;
mod replacement;

use std::fmt;
use std::ops::Range;

use graft_syntax::SyntaxNode;
use serde::Serialize;

use crate::error::RewriteError;

/// The eight directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Adds code before the closing line of a block.
    Append,
    /// Adds code right after the opening line of a block.
    Prepend,
    /// Adds code at the start or end of a node or child.
    Insert,
    /// Deletes one or more children.
    Delete,
    /// Removes the node, including its line when it stands alone.
    Remove,
    /// Replaces one or more children.
    Replace,
    /// Replaces the whole node.
    ReplaceWith,
    /// Turns the node into line comments.
    CommentOut,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::ReplaceWith => "replace_with",
            Self::CommentOut => "comment_out",
        };
        f.write_str(name)
    }
}

/// Where [`insert`](crate::Instance::insert) places its code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertAt {
    /// Before the target's first byte.
    Beginning,
    /// After the target's last byte.
    #[default]
    End,
}

/// Options for [`insert`](crate::Instance::insert).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    at: InsertAt,
    to: Option<String>,
}

impl InsertOptions {
    /// Inserts at the given side of the target.
    #[must_use]
    pub fn at(at: InsertAt) -> Self {
        Self { at, to: None }
    }

    /// Targets a child path instead of the whole node.
    #[must_use]
    pub fn to(mut self, path: impl Into<String>) -> Self {
        self.to = Some(path.into());
        self
    }
}

/// Options for [`replace_with_options`](crate::Instance::replace_with_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceWithOptions {
    /// Re-indents continuation lines to the node's start column.
    pub auto_indent: bool,
}

impl Default for ReplaceWithOptions {
    fn default() -> Self {
        Self { auto_indent: true }
    }
}

/// A positioned edit: replace `start..end` with `new_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
    start: usize,
    end: usize,
    new_code: String,
}

impl Action {
    pub(crate) const fn new(kind: ActionKind, start: usize, end: usize, new_code: String) -> Self {
        Self {
            kind,
            start,
            end,
            new_code,
        }
    }

    /// Returns the directive kind that produced the action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Returns the inclusive start byte.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the exclusive end byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the replaced byte range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the replacement text.
    #[must_use]
    pub fn new_code(&self) -> &str {
        &self.new_code
    }

    /// Returns whether two actions' ranges overlap.
    ///
    /// Touching ranges do not overlap.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The caller-facing record of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    /// Inclusive start byte.
    pub start: usize,
    /// Exclusive end byte.
    pub end: usize,
    /// Replacement text.
    pub new_code: String,
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        Self {
            start: action.start,
            end: action.end,
            new_code: action.new_code.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum DirectiveKind {
    Append(String),
    Prepend(String),
    Insert {
        code: String,
        options: InsertOptions,
    },
    Delete(Vec<String>),
    Remove,
    Replace {
        paths: Vec<String>,
        code: String,
    },
    ReplaceWith {
        code: String,
        options: ReplaceWithOptions,
    },
    CommentOut,
}

/// A directive recorded against a node, not yet positioned.
#[derive(Debug, Clone)]
pub(crate) struct Directive<'t> {
    node: SyntaxNode<'t>,
    kind: DirectiveKind,
}

impl<'t> Directive<'t> {
    pub(crate) const fn new(node: SyntaxNode<'t>, kind: DirectiveKind) -> Self {
        Self { node, kind }
    }

    /// Computes the range and replacement text.
    ///
    /// Positioning only reads the node and its source, so positioning the
    /// same directive twice yields the same action.
    pub(crate) fn position(&self, tab_width: usize) -> Result<Action, RewriteError> {
        let node = self.node;
        let action = match &self.kind {
            DirectiveKind::Append(code) => insertion::append(node, code, tab_width)?,
            DirectiveKind::Prepend(code) => insertion::prepend(node, code, tab_width)?,
            DirectiveKind::Insert { code, options } => insertion::insert(node, code, options)?,
            DirectiveKind::Delete(paths) => deletion::delete(node, paths)?,
            DirectiveKind::Remove => deletion::remove(node),
            DirectiveKind::Replace { paths, code } => replacement::replace(node, paths, code)?,
            DirectiveKind::ReplaceWith { code, options } => {
                replacement::replace_with(node, code, *options)
            }
            DirectiveKind::CommentOut => replacement::comment_out(node),
        };
        check_range(node.source(), &action)?;
        Ok(action)
    }
}

fn check_range(source: &str, action: &Action) -> Result<(), RewriteError> {
    let valid = action.start <= action.end
        && source.is_char_boundary(action.start)
        && source.is_char_boundary(action.end);
    if valid {
        Ok(())
    } else {
        Err(RewriteError::InvalidRange {
            start: action.start,
            end: action.end,
            len: source.len(),
        })
    }
}

/// Prefixes every non-blank line of `code` with `width` spaces and
/// terminates the result with a newline.
fn indent_block(code: &str, width: usize) -> String {
    let padding = " ".repeat(width);
    let mut indented: String = code
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{padding}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    indented.push('\n');
    indented
}

#[cfg(test)]
mod tests;
