//! Rewriter configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default indentation unit used by append and prepend.
pub const DEFAULT_TAB_WIDTH: usize = 2;

/// What the coordinator does when actions in a pass overlap.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Apply the surviving actions, then re-run the script on the result.
    #[default]
    KeepRunning,
    /// Stop with [`RewriteError::Conflict`](crate::RewriteError::Conflict).
    FailFast,
}

/// Settings shared by every file a [`Rewriter`](crate::Rewriter) touches.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewriterConfig {
    tab_width: usize,
    conflict_strategy: ConflictStrategy,
    max_passes: Option<NonZeroUsize>,
    reject_syntax_errors: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            conflict_strategy: ConflictStrategy::default(),
            max_passes: None,
            reject_syntax_errors: true,
        }
    }
}

impl RewriterConfig {
    /// Returns the indentation unit for appended and prepended code.
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Returns the conflict strategy.
    #[must_use]
    pub const fn conflict_strategy(&self) -> ConflictStrategy {
        self.conflict_strategy
    }

    /// Returns the pass limit; `None` means unbounded.
    #[must_use]
    pub const fn max_passes(&self) -> Option<NonZeroUsize> {
        self.max_passes
    }

    /// Returns whether text that parses with errors fails the file.
    #[must_use]
    pub const fn reject_syntax_errors(&self) -> bool {
        self.reject_syntax_errors
    }

    /// Sets the indentation unit.
    #[must_use]
    pub const fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Sets the conflict strategy.
    #[must_use]
    pub const fn with_conflict_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = strategy;
        self
    }

    /// Bounds the number of passes per file.
    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: NonZeroUsize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Sets whether text that parses with errors fails the file.
    #[must_use]
    pub const fn with_reject_syntax_errors(mut self, reject: bool) -> Self {
        self.reject_syntax_errors = reject;
        self
    }
}
