//! The scripting context handed to snippets.
//!
//! An [`Instance`] lives for one pass over one file. It owns the
//! current-node stack that scopes push onto and pop from, and it records
//! the directives the script emits. Nothing is positioned or applied until
//! the script has returned.

use std::path::Path;

use graft_syntax::{LanguageAdapter, ParseResult, Query, SyntaxNode};

use crate::action::{Action, Directive, DirectiveKind, InsertOptions, ReplaceWithOptions};
use crate::error::RewriteError;
use crate::snippet::Snippet;

/// Script context for one pass over one file.
#[derive(Debug)]
pub struct Instance<'t> {
    parsed: &'t ParseResult,
    file_path: Option<&'t Path>,
    stack: Vec<SyntaxNode<'t>>,
    directives: Vec<Directive<'t>>,
}

impl<'t> Instance<'t> {
    pub(crate) fn new(parsed: &'t ParseResult, file_path: Option<&'t Path>) -> Self {
        Self {
            parsed,
            file_path,
            stack: vec![parsed.root()],
            directives: Vec::new(),
        }
    }

    /// Returns the node directives currently target.
    #[must_use]
    pub fn current_node(&self) -> SyntaxNode<'t> {
        self.stack
            .last()
            .copied()
            .unwrap_or_else(|| self.parsed.root())
    }

    /// Returns the file being processed, when there is one.
    #[must_use]
    pub const fn file_path(&self) -> Option<&'t Path> {
        self.file_path
    }

    /// Returns the text of the current pass.
    #[must_use]
    pub fn source(&self) -> &'t str {
        self.parsed.source()
    }

    /// Returns the language adapter of the file.
    #[must_use]
    pub fn adapter(&self) -> &'t dyn LanguageAdapter {
        self.parsed.adapter()
    }

    /// Compiles a Tree-sitter query for this file's grammar.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Syntax`] when the query does not compile.
    pub fn query(&self, source: &str) -> Result<Query, RewriteError> {
        Ok(Query::compile(source, self.adapter())?)
    }

    /// Runs another snippet's script against this context.
    ///
    /// # Errors
    ///
    /// Propagates the helper's error.
    pub fn call_helper(&mut self, helper: &Snippet) -> Result<(), RewriteError> {
        helper.run(self)
    }

    /// Runs `callback` with `node` as the current node, restoring the
    /// previous one afterwards on every path.
    pub(crate) fn with_current<F>(
        &mut self,
        node: SyntaxNode<'t>,
        callback: &mut F,
    ) -> Result<(), RewriteError>
    where
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.stack.push(node);
        let result = callback(self);
        self.stack.pop();
        result
    }

    fn record(&mut self, kind: DirectiveKind) {
        let node = self.current_node();
        self.directives.push(Directive::new(node, kind));
    }

    /// Positions every recorded directive.
    pub(crate) fn into_actions(self, tab_width: usize) -> Result<Vec<Action>, RewriteError> {
        self.directives
            .iter()
            .map(|directive| directive.position(tab_width))
            .collect()
    }

    /// Adds `code` before the closing line of the current node, one
    /// indentation level deeper.
    pub fn append(&mut self, code: impl Into<String>) {
        self.record(DirectiveKind::Append(code.into()));
    }

    /// Adds `code` at the top of the current node's body.
    pub fn prepend(&mut self, code: impl Into<String>) {
        self.record(DirectiveKind::Prepend(code.into()));
    }

    /// Inserts `code` at the beginning or end of the current node, or of
    /// the child named by [`InsertOptions::to`].
    pub fn insert(&mut self, code: impl Into<String>, options: InsertOptions) {
        self.record(DirectiveKind::Insert {
            code: code.into(),
            options,
        });
    }

    /// Deletes the span covering the given child paths.
    pub fn delete_node<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record(DirectiveKind::Delete(
            paths.into_iter().map(Into::into).collect(),
        ));
    }

    /// Removes the current node.
    pub fn remove(&mut self) {
        self.record(DirectiveKind::Remove);
    }

    /// Replaces the span covering the given child paths with the rendered
    /// template.
    pub fn replace<I, S>(&mut self, paths: I, with: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record(DirectiveKind::Replace {
            paths: paths.into_iter().map(Into::into).collect(),
            code: with.into(),
        });
    }

    /// Replaces the current node with the rendered template, re-indenting
    /// continuation lines.
    pub fn replace_with(&mut self, code: impl Into<String>) {
        self.replace_with_options(code, ReplaceWithOptions::default());
    }

    /// Replaces the current node with the rendered template.
    pub fn replace_with_options(&mut self, code: impl Into<String>, options: ReplaceWithOptions) {
        self.record(DirectiveKind::ReplaceWith {
            code: code.into(),
            options,
        });
    }

    /// Comments out the current node line by line.
    pub fn comment_out(&mut self) {
        self.record(DirectiveKind::CommentOut);
    }
}
