//! Structural search-and-rewrite engine.
//!
//! A [`Snippet`] is a script that walks a parsed file through an
//! [`Instance`]: scopes such as [`Instance::within_node`] narrow the
//! current node to matches of a [`Pattern`] (a [`Rule`], a Tree-sitter
//! [`Query`](graft_syntax::Query) or a [`predicate`]), conditions gate
//! callbacks on structural tests, and directives such as
//! [`Instance::replace`] or [`Instance::remove`] record edits against the
//! current node. A [`Rewriter`] positions those edits, drops overlapping
//! ones, splices the rest into the text and repeats until a pass finishes
//! without conflicts.
//!
//! Everything language specific lives behind the
//! [`LanguageAdapter`](graft_syntax::LanguageAdapter) of the `graft-syntax`
//! crate.
//!
//! # Example
//!
//! ```
//! use graft::{Rewriter, Rule, Snippet};
//! use serde_json::json;
//!
//! let rule = Rule::from_json(&json!({
//!     "kind": "class_declaration",
//!     "name": "FooBar",
//! }))?;
//! let snippet = Snippet::new("rename", move |instance| {
//!     instance.within_node(&rule, |instance| {
//!         instance.replace(["name"], "Synvert");
//!         Ok(())
//!     })
//! });
//!
//! let result = Rewriter::new(snippet).process_source("class FooBar {}")?;
//! assert_eq!(result.output, "class Synvert {}");
//! # Ok::<(), graft::RewriteError>(())
//! ```

pub mod action;
mod condition;
mod config;
mod error;
mod instance;
mod mutation;
mod pattern;
mod rewriter;
mod rule;
mod scope;
mod snippet;
pub mod template;
pub mod value;

pub use action::{
    Action, ActionKind, ActionRecord, InsertAt, InsertOptions, ReplaceWithOptions,
};
pub use condition::{ConditionCallback, ConditionOptions};
pub use config::{ConflictStrategy, DEFAULT_TAB_WIDTH, RewriterConfig};
pub use error::RewriteError;
pub use instance::Instance;
pub use pattern::{FnPattern, Pattern, descendants, predicate};
pub use rewriter::{ProcessResult, Rewriter, TestResult};
pub use rule::{Expected, Rule};
pub use scope::WithinOptions;
pub use snippet::Snippet;

#[cfg(test)]
mod tests;
