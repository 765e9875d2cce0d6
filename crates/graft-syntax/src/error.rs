//! Error types for the tree adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of grammar setup, language detection, parsing and queries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The Tree-sitter runtime rejected a grammar.
    #[error("grammar {language} could not be loaded: {message}")]
    ParserInitError {
        /// Adapter name.
        language: String,
        /// Runtime message.
        message: String,
    },

    /// No bundled grammar claims the file's extension.
    #[error("no grammar claims {}", path.display())]
    UnknownLanguage {
        /// The file that was offered.
        path: PathBuf,
    },

    /// The text does not form a valid tree.
    #[error("failed to parse {language} at {line}:{column}: {message}")]
    ParseError {
        /// Adapter name.
        language: String,
        /// One-based line of the first problem.
        line: u32,
        /// One-based column of the first problem.
        column: u32,
        /// What went wrong there.
        message: String,
    },

    /// A Tree-sitter query did not compile.
    #[error("invalid query for {language}: {message}")]
    InvalidQuery {
        /// Adapter name.
        language: String,
        /// Compiler message.
        message: String,
    },
}

impl SyntaxError {
    /// Builds a [`SyntaxError::ParserInitError`].
    #[must_use]
    pub fn parser_init(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Builds a [`SyntaxError::UnknownLanguage`].
    #[must_use]
    pub const fn unknown_language(path: PathBuf) -> Self {
        Self::UnknownLanguage { path }
    }

    /// Builds a [`SyntaxError::ParseError`] at a one-based position.
    #[must_use]
    pub fn parse(
        language: impl Into<String>,
        (line, column): (u32, u32),
        message: impl Into<String>,
    ) -> Self {
        Self::ParseError {
            language: language.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Builds a [`SyntaxError::InvalidQuery`].
    #[must_use]
    pub fn invalid_query(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            language: language.into(),
            message: message.into(),
        }
    }
}
