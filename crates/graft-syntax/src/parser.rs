//! Parsing through a [`LanguageAdapter`].
//!
//! A [`ParseResult`] owns the tree, the text and the adapter, so every
//! [`SyntaxNode`] borrowed from it stays valid for as long as it lives.

use std::ops::Range;
use std::sync::Arc;

use crate::adapter::LanguageAdapter;
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::node::SyntaxNode;
use crate::position::LineCol;

/// An owned parse of one text.
///
/// Trees may hold error nodes next to usable structure;
/// [`ParseResult::ensure_valid`] turns the first one into a
/// [`SyntaxError`].
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    adapter: Arc<dyn LanguageAdapter>,
}

impl ParseResult {
    /// Returns the underlying Tree-sitter tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the text the tree was built from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the adapter used to parse the source.
    #[must_use]
    pub fn adapter(&self) -> &dyn LanguageAdapter {
        &*self.adapter
    }

    /// Returns a view of the root node.
    #[must_use]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.tree.root_node(), &self.source, &*self.adapter)
    }

    /// Returns whether the tree holds ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Lists the ERROR and MISSING nodes in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorSite> {
        error_sites(&self.tree, &self.source)
    }

    /// Fails with the first syntax error, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] located at the first error node.
    pub fn ensure_valid(&self) -> Result<(), SyntaxError> {
        if !self.has_errors() {
            return Ok(());
        }
        let errors = self.errors();
        let Some(first) = errors.first() else {
            return Err(SyntaxError::parse(
                self.adapter.name(),
                (1, 1),
                "syntax error",
            ));
        };
        Err(SyntaxError::parse(
            self.adapter.name(),
            (first.line, first.column),
            format!("{} near `{}`", first.message, first.context),
        ))
    }
}

/// One ERROR or MISSING node of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSite {
    /// Bytes covered by the node.
    pub byte_range: Range<usize>,
    /// One-based line of the node's start.
    pub line: u32,
    /// One-based column of the node's start.
    pub column: u32,
    /// The covered text, shortened to [`EXCERPT_CHARS`] characters.
    pub context: String,
    /// `missing <kind>` for inserted tokens, `syntax error` otherwise.
    pub message: String,
}

/// Longest excerpt kept in [`ErrorSite::context`].
pub const EXCERPT_CHARS: usize = 48;

impl ErrorSite {
    fn at(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let (line, column) = LineCol::from(node.start_position()).one_based();
        let text = source.get(node.byte_range()).unwrap_or_default();
        let context = match text.char_indices().nth(EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}...", text.get(..cut).unwrap_or_default()),
            None => text.to_owned(),
        };
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            String::from("syntax error")
        };
        Self {
            byte_range: node.byte_range(),
            line,
            column,
            context,
            message,
        }
    }
}

/// A reusable parser bound to one adapter.
pub struct Parser {
    inner: tree_sitter::Parser,
    adapter: Arc<dyn LanguageAdapter>,
}

impl Parser {
    /// Creates a parser for one of the bundled grammars.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInitError`] when the grammar is
    /// rejected by the runtime.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        Self::with_adapter(Arc::new(language))
    }

    /// Creates a new parser for a custom adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter's grammar is incompatible with the
    /// linked Tree-sitter runtime.
    pub fn with_adapter(adapter: Arc<dyn LanguageAdapter>) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&adapter.grammar())
            .map_err(|err| SyntaxError::parser_init(adapter.name(), err.to_string()))?;
        Ok(Self { inner, adapter })
    }

    /// Returns the adapter this parser is configured with.
    #[must_use]
    pub fn adapter(&self) -> &dyn LanguageAdapter {
        &*self.adapter
    }

    /// Parses `source` into an owned tree.
    ///
    /// Syntax errors do not fail the call; inspect
    /// [`ParseResult::errors`] or call [`ParseResult::ensure_valid`].
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] when Tree-sitter produces no tree
    /// at all.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.adapter.name(), (1, 1), "parsing failed"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            adapter: Arc::clone(&self.adapter),
        })
    }
}

/// Walks the tree in pre-order and records every ERROR or MISSING node.
fn error_sites(tree: &tree_sitter::Tree, source: &str) -> Vec<ErrorSite> {
    let mut sites = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            sites.push(ErrorSite::at(node, source));
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return sites;
            }
        }
    }
}
