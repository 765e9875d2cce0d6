//! Node patterns and recursive search.
//!
//! Anything that can test a single node implements [`Pattern`]: compiled
//! [`Rule`](crate::Rule)s, Tree-sitter [`Query`]s and plain predicates
//! wrapped with [`predicate`]. Scopes and conditions only ever talk to this
//! trait.

use graft_syntax::{Query, SyntaxNode};

/// A structural test over syntax nodes.
pub trait Pattern {
    /// Returns whether `node` satisfies the pattern.
    fn matches(&self, node: SyntaxNode<'_>) -> bool;

    /// Returns every matching node below `root` in document pre-order.
    ///
    /// `root` itself is tested only when `include_self` is set.
    fn find_all<'t>(&self, root: SyntaxNode<'t>, include_self: bool) -> Vec<SyntaxNode<'t>> {
        descendants(root, include_self)
            .into_iter()
            .filter(|node| self.matches(*node))
            .collect()
    }
}

/// Returns `root`'s named descendants in document pre-order.
///
/// Every node is visited exactly once.
#[must_use]
pub fn descendants(root: SyntaxNode<'_>, include_self: bool) -> Vec<SyntaxNode<'_>> {
    let mut visited = Vec::new();
    let mut stack = if include_self {
        vec![root]
    } else {
        root.children().into_iter().rev().collect()
    };
    while let Some(node) = stack.pop() {
        visited.push(node);
        stack.extend(node.children().into_iter().rev());
    }
    visited
}

impl Pattern for Query {
    fn matches(&self, node: SyntaxNode<'_>) -> bool {
        Query::find_all(self, node).contains(&node)
    }

    fn find_all<'t>(&self, root: SyntaxNode<'t>, include_self: bool) -> Vec<SyntaxNode<'t>> {
        let mut found = Query::find_all(self, root);
        if !include_self {
            found.retain(|node| *node != root);
        }
        found
    }
}

impl<P: Pattern + ?Sized> Pattern for &P {
    fn matches(&self, node: SyntaxNode<'_>) -> bool {
        (**self).matches(node)
    }

    fn find_all<'t>(&self, root: SyntaxNode<'t>, include_self: bool) -> Vec<SyntaxNode<'t>> {
        (**self).find_all(root, include_self)
    }
}

/// A pattern backed by a closure.
#[derive(Debug, Clone, Copy)]
pub struct FnPattern<F>(F);

impl<F> Pattern for FnPattern<F>
where
    F: Fn(SyntaxNode<'_>) -> bool,
{
    fn matches(&self, node: SyntaxNode<'_>) -> bool {
        (self.0)(node)
    }
}

/// Wraps a closure as a [`Pattern`].
///
/// # Example
///
/// ```
/// use graft::{Pattern, predicate};
///
/// let is_call = predicate(|node| node.kind() == "call_expression");
/// # let _ = &is_call;
/// ```
#[must_use]
pub const fn predicate<F>(test: F) -> FnPattern<F>
where
    F: Fn(SyntaxNode<'_>) -> bool,
{
    FnPattern(test)
}
