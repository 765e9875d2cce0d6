//! Language adapters: the grammar-specific half of the tree adapter.
//!
//! The rewrite engine works on tree shape and byte ranges only. Whatever it
//! needs to know about a particular grammar is asked through
//! [`LanguageAdapter`]: synthetic child names that have no grammar field
//! (a member-access dot, the inner expression of a statement), where the
//! body block of a node lives, how a line comment starts, and which node
//! kinds are self references.
//!
//! [`SupportedLanguage`] implements the trait for the bundled grammars.
//! Other grammars can be plugged in by implementing it on a custom type and
//! handing that to [`Parser::with_adapter`](crate::Parser::with_adapter).

use std::fmt;

use crate::language::SupportedLanguage;
use crate::node::{SyntaxNode, Value};

/// Grammar-specific knowledge consumed by the rewrite engine.
pub trait LanguageAdapter: fmt::Debug + Send + Sync {
    /// Returns a short identifier used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the Tree-sitter grammar.
    fn grammar(&self) -> tree_sitter::Language;

    /// Resolves a synthetic accessor that has no grammar field.
    ///
    /// Called only after grammar fields failed to resolve `name`.
    fn accessor<'t>(&self, node: SyntaxNode<'t>, name: &str) -> Option<Value<'t>> {
        let _ = (node, name);
        None
    }

    /// Returns the statement or member block of `node`.
    fn body<'t>(&self, node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
        node.grammar_field("body").and_then(|value| value.as_node())
    }

    /// Returns whether `kind` denotes a `this`/`super` style reference.
    fn is_self_reference(&self, kind: &str) -> bool {
        let _ = kind;
        false
    }

    /// Returns the marker that starts a line comment.
    fn line_comment(&self) -> &str {
        "//"
    }

    /// Returns the characters that may trail a statement or list entry.
    fn statement_terminators(&self) -> &[char] {
        &[';', ',']
    }
}

impl LanguageAdapter for SupportedLanguage {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn grammar(&self) -> tree_sitter::Language {
        self.bundled_grammar()
    }

    fn accessor<'t>(&self, node: SyntaxNode<'t>, name: &str) -> Option<Value<'t>> {
        match (self, name) {
            (Self::TypeScript, "dot") => token(node, &[".", "?."]).map(Value::Node),
            (Self::Rust, "dot") => token(node, &["."]).map(Value::Node),
            (Self::TypeScript, "expression") => inner_expression(node).map(Value::Node),
            (Self::TypeScript | Self::Rust, "semicolon") => token(node, &[";"]).map(Value::Node),
            (_, "elements") => Some(Value::Nodes(elements(node))),
            _ => None,
        }
    }

    fn body<'t>(&self, node: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
        if let Some(body) = node.grammar_field("body").and_then(|value| value.as_node()) {
            return Some(body);
        }
        match self {
            // Arrow functions and class expressions keep their block unnamed
            // in some grammar revisions.
            Self::TypeScript => node
                .children()
                .into_iter()
                .find(|child| matches!(child.kind(), "statement_block" | "class_body")),
            Self::Rust => node
                .children()
                .into_iter()
                .find(|child| matches!(child.kind(), "block" | "declaration_list")),
            Self::Python => None,
        }
    }

    fn is_self_reference(&self, kind: &str) -> bool {
        match self {
            Self::TypeScript => matches!(kind, "this" | "super"),
            Self::Rust => matches!(kind, "self" | "super"),
            Self::Python => false,
        }
    }

    fn line_comment(&self) -> &str {
        match self {
            Self::Python => "#",
            Self::Rust | Self::TypeScript => "//",
        }
    }

    fn statement_terminators(&self) -> &[char] {
        match self {
            Self::Python => &[','],
            Self::Rust | Self::TypeScript => &[';', ','],
        }
    }
}

/// Finds the first anonymous child token whose kind is one of `kinds`.
fn token<'t>(node: SyntaxNode<'t>, kinds: &[&str]) -> Option<SyntaxNode<'t>> {
    node.all_children()
        .into_iter()
        .find(|child| !child.is_named() && kinds.contains(&child.kind()))
}

/// Returns the wrapped expression of statement-like wrappers.
fn inner_expression(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    match node.kind() {
        "expression_statement" | "parenthesized_expression" => node
            .children()
            .into_iter()
            .find(|child| child.kind() != "comment"),
        _ => None,
    }
}

/// Returns the named, non-comment children of list-like nodes.
fn elements(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    node.children()
        .into_iter()
        .filter(|child| !child.kind().contains("comment"))
        .collect()
}
