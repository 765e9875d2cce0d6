//! Tree adapter for the graft rewrite engine.
//!
//! The engine in the `graft` crate works on tree shape and text ranges
//! only. This crate supplies everything it consumes about a parsed tree:
//!
//! - **Parsing** via [`Parser`], producing a [`ParseResult`] that owns the
//!   tree and the text
//! - **Node views** via [`SyntaxNode`]: kind, byte range, positions,
//!   children, and named accessors resolved one step at a time through
//!   [`SyntaxNode::field`]
//! - **Grammar knowledge** via the [`LanguageAdapter`] trait, implemented by
//!   [`SupportedLanguage`] for the bundled grammars
//! - **Queries** via [`Query`], Tree-sitter S-expressions reporting their
//!   `@node` capture
//!
//! # Supported Languages
//!
//! - Rust (`.rs`)
//! - Python (`.py`, `.pyi`)
//! - TypeScript and JavaScript (`.ts`, `.tsx`, `.js`, `.jsx`, ...)
//!
//! # Example
//!
//! ```
//! use graft_syntax::{Parser, SupportedLanguage, Value};
//!
//! let mut parser = Parser::new(SupportedLanguage::TypeScript)?;
//! let parsed = parser.parse("class FooBar {}")?;
//! let class = parsed.root().children()[0];
//!
//! let Some(Value::Node(name)) = class.field("name") else {
//!     panic!("class has a name");
//! };
//! assert_eq!(name.text(), "FooBar");
//! # Ok::<(), graft_syntax::SyntaxError>(())
//! ```

pub mod adapter;
mod error;
mod language;
mod node;
mod parser;
mod position;
mod query;

pub use adapter::LanguageAdapter;
pub use error::SyntaxError;
pub use language::{SupportedLanguage, UnknownLanguageName};
pub use node::{SyntaxNode, Value};
pub use parser::{EXCERPT_CHARS, ErrorSite, ParseResult, Parser};
pub use position::LineCol;
pub use query::Query;

#[cfg(test)]
mod tests;
