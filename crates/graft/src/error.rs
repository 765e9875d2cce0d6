//! Error types for the rewrite engine.

use std::path::PathBuf;

use graft_syntax::SyntaxError;
use thiserror::Error;

/// Errors raised while matching, positioning or applying rewrites.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RewriteError {
    /// A directive referenced a child path the node cannot resolve.
    #[error("{path} is not supported for {kind}")]
    UnresolvedPath {
        /// The dotted child path.
        path: String,
        /// Kind of the node the path was resolved against.
        kind: String,
    },

    /// The tree adapter could not parse the current text.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A rule could not be compiled.
    #[error("invalid rule: {message}")]
    InvalidRule {
        /// Description of the problem.
        message: String,
    },

    /// Two actions overlapped while running with the fail-fast strategy.
    #[error("conflicting actions at bytes {start}..{end}")]
    Conflict {
        /// Start of the discarded action.
        start: usize,
        /// End of the discarded action.
        end: usize,
    },

    /// The pass limit was reached while conflicts remained.
    #[error("rewrite did not converge after {passes} passes")]
    NonConvergence {
        /// Number of passes executed.
        passes: usize,
    },

    /// A computed range is not valid for the buffer it targets.
    #[error("invalid edit range {start}..{end} for a buffer of {len} bytes")]
    InvalidRange {
        /// Start of the range.
        start: usize,
        /// End of the range.
        end: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// Reading or writing a file failed.
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// What was being attempted.
        operation: &'static str,
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A script reported its own failure.
    #[error("snippet {snippet} failed: {message}")]
    Script {
        /// Name of the failing snippet.
        snippet: String,
        /// Description supplied by the script.
        message: String,
    },
}

impl RewriteError {
    /// Creates an unresolved path error.
    #[must_use]
    pub fn unresolved_path(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnresolvedPath {
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// Creates an invalid rule error.
    #[must_use]
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule {
            message: message.into(),
        }
    }

    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Creates a script error.
    #[must_use]
    pub fn script(snippet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            snippet: snippet.into(),
            message: message.into(),
        }
    }
}
