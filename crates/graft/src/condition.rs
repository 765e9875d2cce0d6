//! Conditions: structural predicates that gate a callback without changing
//! the current node.
//!
//! Every condition searches a target subtree, which is the current node or
//! the child named by [`ConditionOptions::in_path`]. The search covers the
//! target's descendants, not the target itself. A target path that does not
//! resolve to a node behaves like a subtree without matches.

use graft_syntax::SyntaxNode;

use crate::error::RewriteError;
use crate::instance::Instance;
use crate::pattern::Pattern;
use crate::value::resolve;

/// Options shared by the conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionOptions {
    in_path: Option<String>,
}

impl ConditionOptions {
    /// Searches the child at `path` instead of the current node.
    #[must_use]
    pub fn in_path(path: impl Into<String>) -> Self {
        Self {
            in_path: Some(path.into()),
        }
    }
}

/// A borrowed condition branch, as taken by the `*_with` variants.
pub type ConditionCallback<'c, 't> =
    &'c mut dyn FnMut(&mut Instance<'t>) -> Result<(), RewriteError>;

fn skip(_: &mut Instance<'_>) -> Result<(), RewriteError> {
    Ok(())
}

impl<'t> Instance<'t> {
    fn condition_target(&self, options: &ConditionOptions) -> Option<SyntaxNode<'t>> {
        let current = self.current_node();
        match options.in_path.as_deref() {
            Some(path) => resolve(current, path).and_then(|value| value.as_node()),
            None => Some(current),
        }
    }

    fn branch(
        &mut self,
        holds: bool,
        then: ConditionCallback<'_, 't>,
        otherwise: ConditionCallback<'_, 't>,
    ) -> Result<(), RewriteError> {
        if holds { then(self) } else { otherwise(self) }
    }

    fn exists<P: Pattern + ?Sized>(&self, pattern: &P, options: &ConditionOptions) -> bool {
        self.condition_target(options)
            .is_some_and(|target| !pattern.find_all(target, false).is_empty())
    }

    fn only_exists<P: Pattern + ?Sized>(&self, pattern: &P, options: &ConditionOptions) -> bool {
        let Some(target) = self.condition_target(options) else {
            return false;
        };
        let body = target.adapter().body(target).unwrap_or(target);
        let members: Vec<_> = body
            .children()
            .into_iter()
            .filter(|child| !child.kind().contains("comment"))
            .collect();
        match members.as_slice() {
            [only] => pattern.matches(*only),
            _ => false,
        }
    }

    /// Runs `then` when a node matching `pattern` exists below the current
    /// node.
    ///
    /// # Errors
    ///
    /// Returns the callback's error.
    pub fn if_exist_node<P, F>(&mut self, pattern: &P, mut then: F) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.if_exist_node_with(pattern, &ConditionOptions::default(), &mut then, &mut skip)
    }

    /// Runs `then` when a matching node exists, `otherwise` when none does.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_exist_node_or_else<P, F, G>(
        &mut self,
        pattern: &P,
        mut then: F,
        mut otherwise: G,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
        G: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.if_exist_node_with(pattern, &ConditionOptions::default(), &mut then, &mut otherwise)
    }

    /// [`if_exist_node_or_else`](Self::if_exist_node_or_else) searching the
    /// target selected by `options`.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_exist_node_with<P>(
        &mut self,
        pattern: &P,
        options: &ConditionOptions,
        then: ConditionCallback<'_, 't>,
        otherwise: ConditionCallback<'_, 't>,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
    {
        let holds = self.exists(pattern, options);
        self.branch(holds, then, otherwise)
    }

    /// Runs `then` when no node matching `pattern` exists below the current
    /// node.
    ///
    /// # Errors
    ///
    /// Returns the callback's error.
    pub fn unless_exist_node<P, F>(&mut self, pattern: &P, mut then: F) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.unless_exist_node_with(pattern, &ConditionOptions::default(), &mut then, &mut skip)
    }

    /// Runs `then` when no matching node exists, `otherwise` when one does.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn unless_exist_node_or_else<P, F, G>(
        &mut self,
        pattern: &P,
        mut then: F,
        mut otherwise: G,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
        G: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.unless_exist_node_with(pattern, &ConditionOptions::default(), &mut then, &mut otherwise)
    }

    /// [`unless_exist_node_or_else`](Self::unless_exist_node_or_else)
    /// searching the target selected by `options`.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn unless_exist_node_with<P>(
        &mut self,
        pattern: &P,
        options: &ConditionOptions,
        then: ConditionCallback<'_, 't>,
        otherwise: ConditionCallback<'_, 't>,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
    {
        let holds = !self.exists(pattern, options);
        self.branch(holds, then, otherwise)
    }

    /// Runs `then` when the current node's body holds exactly one member
    /// and that member matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the callback's error.
    pub fn if_only_exist_node<P, F>(&mut self, pattern: &P, mut then: F) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.if_only_exist_node_with(pattern, &ConditionOptions::default(), &mut then, &mut skip)
    }

    /// Runs `then` when the body's single member matches, `otherwise`
    /// when it does not.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_only_exist_node_or_else<P, F, G>(
        &mut self,
        pattern: &P,
        mut then: F,
        mut otherwise: G,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
        G: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.if_only_exist_node_with(
            pattern,
            &ConditionOptions::default(),
            &mut then,
            &mut otherwise,
        )
    }

    /// [`if_only_exist_node_or_else`](Self::if_only_exist_node_or_else)
    /// inspecting the target selected by `options`.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_only_exist_node_with<P>(
        &mut self,
        pattern: &P,
        options: &ConditionOptions,
        then: ConditionCallback<'_, 't>,
        otherwise: ConditionCallback<'_, 't>,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
    {
        let holds = self.only_exists(pattern, options);
        self.branch(holds, then, otherwise)
    }

    /// Collects the nodes matching `pattern` below the current node and
    /// runs `then` when there is at least one and every one satisfies
    /// `each`, `otherwise` when some do not. No match runs neither.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_all_nodes<P, M, F, G>(
        &mut self,
        pattern: &P,
        each: &M,
        mut then: F,
        mut otherwise: G,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        M: Pattern + ?Sized,
        F: FnMut(&mut Self) -> Result<(), RewriteError>,
        G: FnMut(&mut Self) -> Result<(), RewriteError>,
    {
        self.if_all_nodes_with(
            pattern,
            each,
            &ConditionOptions::default(),
            &mut then,
            &mut otherwise,
        )
    }

    /// [`if_all_nodes`](Self::if_all_nodes) searching the target selected
    /// by `options`.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever callback ran.
    pub fn if_all_nodes_with<P, M>(
        &mut self,
        pattern: &P,
        each: &M,
        options: &ConditionOptions,
        then: ConditionCallback<'_, 't>,
        otherwise: ConditionCallback<'_, 't>,
    ) -> Result<(), RewriteError>
    where
        P: Pattern + ?Sized,
        M: Pattern + ?Sized,
    {
        let found = self
            .condition_target(options)
            .map(|target| pattern.find_all(target, false))
            .unwrap_or_default();
        if found.is_empty() {
            return Ok(());
        }
        let holds = found.iter().all(|node| each.matches(*node));
        self.branch(holds, then, otherwise)
    }
}
