//! Named rewrite scripts.

use std::fmt;
use std::sync::Arc;

use crate::error::RewriteError;
use crate::instance::Instance;

type Script = dyn Fn(&mut Instance<'_>) -> Result<(), RewriteError> + Send + Sync;

/// A named script run against every file a [`Rewriter`](crate::Rewriter)
/// processes.
///
/// Snippets are cheap to clone and may be shared as helpers through
/// [`Instance::call_helper`].
///
/// # Example
///
/// ```
/// use graft::{Rule, Snippet};
///
/// let snippet = Snippet::new("rename-foobar", |instance| {
///     let rule = Rule::new()
///         .with("kind", "class_declaration")
///         .with("name", "FooBar");
///     instance.within_node(&rule, |instance| {
///         instance.replace(["name"], "Synvert");
///         Ok(())
///     })
/// });
/// assert_eq!(snippet.name(), "rename-foobar");
/// ```
#[derive(Clone)]
pub struct Snippet {
    name: String,
    script: Arc<Script>,
}

impl Snippet {
    /// Wraps `script` under `name`.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, script: F) -> Self
    where
        F: Fn(&mut Instance<'_>) -> Result<(), RewriteError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            script: Arc::new(script),
        }
    }

    /// Returns the snippet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn run(&self, instance: &mut Instance<'_>) -> Result<(), RewriteError> {
        (self.script)(instance)
    }
}

impl fmt::Debug for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snippet")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
