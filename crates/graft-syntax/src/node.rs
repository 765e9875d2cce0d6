//! Read-only node view handed to the rewrite engine.
//!
//! A [`SyntaxNode`] pairs a Tree-sitter node with the source text it was
//! parsed from and the [`LanguageAdapter`] of its grammar. The engine never
//! touches Tree-sitter directly: everything it needs (kind, byte range,
//! positions, children and named accessors) goes through this type.

use std::fmt;
use std::ops::Range;

use crate::adapter::LanguageAdapter;
use crate::position::LineCol;

/// Result of resolving one accessor step on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'t> {
    /// A single child node.
    Node(SyntaxNode<'t>),
    /// An ordered list of nodes, such as call arguments.
    Nodes(Vec<SyntaxNode<'t>>),
    /// A text scalar, such as a node kind.
    Text(String),
    /// An integer scalar, such as a child count.
    Number(i64),
    /// A boolean scalar, such as the `named` flag.
    Bool(bool),
}

impl<'t> Value<'t> {
    /// Builds a value from a list of nodes, collapsing a single node.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_nodes(mut nodes: Vec<SyntaxNode<'t>>) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => nodes.pop().map(Self::Node),
            _ => Some(Self::Nodes(nodes)),
        }
    }

    /// Returns the node when this value holds exactly one.
    #[must_use]
    pub const fn as_node(&self) -> Option<SyntaxNode<'t>> {
        match self {
            Self::Node(node) => Some(*node),
            _ => None,
        }
    }
}

/// A syntax node together with its source text and language adapter.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    raw: tree_sitter::Node<'t>,
    source: &'t str,
    adapter: &'t dyn LanguageAdapter,
}

impl<'t> SyntaxNode<'t> {
    /// Wraps a Tree-sitter node.
    #[must_use]
    pub fn new(
        raw: tree_sitter::Node<'t>,
        source: &'t str,
        adapter: &'t dyn LanguageAdapter,
    ) -> Self {
        Self {
            raw,
            source,
            adapter,
        }
    }

    /// Wraps another node from the same tree.
    #[must_use]
    pub fn wrap(&self, raw: tree_sitter::Node<'t>) -> Self {
        Self::new(raw, self.source, self.adapter)
    }

    /// Returns the underlying Tree-sitter node.
    #[must_use]
    pub const fn raw(&self) -> tree_sitter::Node<'t> {
        self.raw
    }

    /// Returns the complete source text of the file.
    #[must_use]
    pub const fn source(&self) -> &'t str {
        self.source
    }

    /// Returns the adapter of the grammar this node belongs to.
    #[must_use]
    pub fn adapter(&self) -> &'t dyn LanguageAdapter {
        self.adapter
    }

    /// Returns the grammar kind of the node.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.raw.kind()
    }

    /// Returns whether the node is a named grammar node rather than a token.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.raw.is_named()
    }

    /// Returns the half-open byte range of the node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.raw.byte_range()
    }

    /// Returns the inclusive start byte.
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.raw.start_byte()
    }

    /// Returns the exclusive end byte.
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.raw.end_byte()
    }

    /// Returns the zero-based start position.
    #[must_use]
    pub fn start_position(&self) -> LineCol {
        self.raw.start_position().into()
    }

    /// Returns the zero-based end position.
    #[must_use]
    pub fn end_position(&self) -> LineCol {
        self.raw.end_position().into()
    }

    /// Returns the source text covered by the node.
    #[must_use]
    pub fn text(&self) -> &'t str {
        self.source.get(self.byte_range()).unwrap_or_default()
    }

    /// Returns the named children in document order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .named_children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    /// Returns every child, including anonymous tokens, in document order.
    #[must_use]
    pub fn all_children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    /// Returns the parent node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.raw.parent().map(|parent| self.wrap(parent))
    }

    /// Returns the width of the leading whitespace on the node's first line.
    #[must_use]
    pub fn indent(&self) -> usize {
        let before = self.source.get(..self.start_byte()).unwrap_or_default();
        let line_start = before.rfind('\n').map_or(0, |index| index + 1);
        self.source
            .get(line_start..)
            .unwrap_or_default()
            .bytes()
            .take_while(|byte| *byte == b' ' || *byte == b'\t')
            .count()
    }

    /// Returns the text of the node's `name` field, when it has one.
    #[must_use]
    pub fn name_text(&self) -> Option<&'t str> {
        self.raw
            .child_by_field_name("name")
            .and_then(|name| self.source.get(name.byte_range()))
    }

    /// Returns the children stored under a grammar field.
    ///
    /// A field holding one node yields [`Value::Node`]; a repeated field
    /// yields [`Value::Nodes`].
    #[must_use]
    pub fn grammar_field(&self, name: &str) -> Option<Value<'t>> {
        let mut cursor = self.raw.walk();
        let nodes: Vec<_> = self
            .raw
            .children_by_field_name(name, &mut cursor)
            .map(|child| self.wrap(child))
            .collect();
        Value::from_nodes(nodes)
    }

    /// Resolves one accessor step.
    ///
    /// `kind` always reports the node kind, even on grammars that declare a
    /// `kind` field. Otherwise grammar fields win, then the adapter's
    /// synthetic accessors, then the generic ones: `text`, `children`,
    /// `length`, `first`, `last`, the `named` and `missing` flags, and a
    /// numeric index into the named children. Returns `None` when nothing
    /// answers to `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value<'t>> {
        if name == "kind" {
            return Some(Value::Text(self.kind().to_owned()));
        }
        if let Some(value) = self.grammar_field(name) {
            return Some(value);
        }
        if let Some(value) = self.adapter.accessor(*self, name) {
            return Some(value);
        }
        self.generic_accessor(name)
    }

    fn generic_accessor(&self, name: &str) -> Option<Value<'t>> {
        match name {
            "text" => Some(Value::Text(self.text().to_owned())),
            "children" => Some(Value::Nodes(self.children())),
            "length" => i64::try_from(self.raw.named_child_count())
                .ok()
                .map(Value::Number),
            "first" => self.children().first().copied().map(Value::Node),
            "last" => self.children().last().copied().map(Value::Node),
            "named" => Some(Value::Bool(self.raw.is_named())),
            "missing" => Some(Value::Bool(self.raw.is_missing())),
            _ => {
                let index = name.parse::<usize>().ok()?;
                self.children().get(index).copied().map(Value::Node)
            }
        }
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.kind())
            .field("range", &self.byte_range())
            .finish()
    }
}
