//! Scopes: helpers that rebind the current node for a nested callback.

use graft_syntax::Value;

use crate::error::RewriteError;
use crate::instance::Instance;
use crate::pattern::Pattern;
use crate::value::resolve;

/// Options for [`Instance::within_node_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithinOptions {
    /// Tests the current node itself as well as its descendants.
    pub include_self: bool,
}

impl Default for WithinOptions {
    fn default() -> Self {
        Self { include_self: true }
    }
}

impl<'t> Instance<'t> {
    /// Runs `callback` once per node matching `pattern` in the current
    /// node's subtree, the current node included, in document order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error raised by `callback`.
    pub fn within_node<P, F>(&mut self, pattern: &P, callback: F) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.within_node_with(pattern, WithinOptions::default(), callback)
    }

    /// [`within_node`](Self::within_node) with explicit options.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error raised by `callback`.
    pub fn within_node_with<P, F>(
        &mut self,
        pattern: &P,
        options: WithinOptions,
        mut callback: F,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        let matches = pattern.find_all(self.current_node(), options.include_self);
        for node in matches {
            self.with_current(node, &mut callback)?;
        }
        Ok(())
    }

    /// Runs `callback` with the child at `path` as the current node.
    ///
    /// A path resolving to a list visits each element in order; a path
    /// that does not resolve to nodes skips the callback.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `callback`.
    pub fn goto_node<F>(&mut self, path: &str, mut callback: F) -> Result<(), RewriteError>
    where
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        let targets = match resolve(self.current_node(), path) {
            Some(Value::Node(node)) => vec![node],
            Some(Value::Nodes(nodes)) => nodes,
            Some(Value::Text(_) | Value::Number(_) | Value::Bool(_)) | None => Vec::new(),
        };
        for node in targets {
            self.with_current(node, &mut callback)?;
        }
        Ok(())
    }
}
