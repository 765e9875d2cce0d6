//! Crate-level tests for the rewrite engine.
