//! File-level driver: runs a snippet over sources, files and batches.
//!
//! `process_*` runs passes until the text converges and, for files, writes
//! the result back atomically when it changed. `test_*` runs a single pass
//! and reports the surviving actions without touching the disk. Batches run
//! in parallel across files; every file keeps its own parser, buffer and
//! current-node stack, and one file's failure never aborts the others.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use graft_syntax::{LanguageAdapter, Parser, SupportedLanguage, SyntaxError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::action::ActionRecord;
use crate::config::RewriterConfig;
use crate::error::RewriteError;
use crate::mutation::{run_pass, run_to_convergence};
use crate::snippet::Snippet;

/// Tracing target for file-level events.
const REWRITER_TARGET: &str = "graft::rewriter";

/// Outcome of processing one source to convergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    /// The file processed, when the input came from disk.
    pub file_path: Option<PathBuf>,
    /// Whether the text changed.
    pub affected: bool,
    /// Number of passes run.
    pub passes: usize,
    /// The final text.
    pub output: String,
}

/// Outcome of a single dry-run pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// The file tested, when the input came from disk.
    pub file_path: Option<PathBuf>,
    /// Whether the pass produced any action.
    pub affected: bool,
    /// Whether any action was discarded as overlapping.
    pub conflicted: bool,
    /// The surviving actions in ascending order.
    pub actions: Vec<ActionRecord>,
}

/// Runs a [`Snippet`] over source text and files.
///
/// # Example
///
/// ```
/// use graft::{Rewriter, Rule, Snippet};
///
/// let snippet = Snippet::new("double-negation", |instance| {
///     let rule = Rule::new()
///         .with("kind", "unary_expression")
///         .with("argument.kind", "unary_expression");
///     instance.within_node(&rule, |instance| {
///         instance.replace_with("Boolean({{argument.argument}})");
///         Ok(())
///     })
/// });
/// let result = Rewriter::new(snippet).process_source("!!foobar")?;
/// assert_eq!(result.output, "Boolean(foobar)");
/// # Ok::<(), graft::RewriteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Rewriter {
    snippet: Snippet,
    config: RewriterConfig,
    adapter: Option<Arc<dyn LanguageAdapter>>,
}

impl Rewriter {
    /// Creates a rewriter with the default configuration.
    ///
    /// Files are parsed with the grammar their extension selects; bare
    /// sources default to TypeScript.
    #[must_use]
    pub fn new(snippet: Snippet) -> Self {
        Self {
            snippet,
            config: RewriterConfig::default(),
            adapter: None,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: RewriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses every input with one of the bundled grammars.
    #[must_use]
    pub fn with_language(self, language: SupportedLanguage) -> Self {
        self.with_adapter(Arc::new(language))
    }

    /// Parses every input with a custom adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn LanguageAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RewriterConfig {
        &self.config
    }

    /// Returns the snippet being run.
    #[must_use]
    pub const fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    fn parser_for(&self, path: Option<&Path>) -> Result<Parser, RewriteError> {
        let adapter: Arc<dyn LanguageAdapter> = match (&self.adapter, path) {
            (Some(adapter), _) => Arc::clone(adapter),
            (None, Some(file)) => {
                let language = SupportedLanguage::from_path(file)
                    .ok_or_else(|| SyntaxError::unknown_language(file.to_path_buf()))?;
                Arc::new(language)
            }
            (None, None) => Arc::new(SupportedLanguage::default()),
        };
        Ok(Parser::with_adapter(adapter)?)
    }

    fn process_text(
        &self,
        source: &str,
        path: Option<&Path>,
    ) -> Result<ProcessResult, RewriteError> {
        let mut parser = self.parser_for(path)?;
        let converged = run_to_convergence(&mut parser, &self.snippet, source, path, &self.config)?;
        Ok(ProcessResult {
            file_path: path.map(Path::to_path_buf),
            affected: converged.output != source,
            passes: converged.passes,
            output: converged.output,
        })
    }

    fn test_text(&self, source: &str, path: Option<&Path>) -> Result<TestResult, RewriteError> {
        let mut parser = self.parser_for(path)?;
        let resolution = run_pass(&mut parser, &self.snippet, source, path, &self.config)?;
        Ok(TestResult {
            file_path: path.map(Path::to_path_buf),
            affected: !resolution.is_empty(),
            conflicted: resolution.conflicted(),
            actions: resolution.records(),
        })
    }

    /// Rewrites `source` until a pass finishes without conflicts.
    ///
    /// # Errors
    ///
    /// Returns a [`RewriteError`] when the text does not parse, a directive
    /// cannot be positioned, the script fails, or the configured conflict
    /// strategy or pass limit stops the loop.
    pub fn process_source(&self, source: &str) -> Result<ProcessResult, RewriteError> {
        self.process_text(source, None)
    }

    /// Runs one pass over `source` and reports its actions.
    ///
    /// # Errors
    ///
    /// Returns a [`RewriteError`] when the text does not parse, a directive
    /// cannot be positioned, or the script fails.
    pub fn test_source(&self, source: &str) -> Result<TestResult, RewriteError> {
        self.test_text(source, None)
    }

    /// Rewrites the file at `path`, writing it back when the text changed.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] when the file cannot be read or
    /// written, and the errors of [`process_source`](Self::process_source).
    pub fn process_file(&self, path: &Path) -> Result<ProcessResult, RewriteError> {
        let source = read_source(path)?;
        let result = self.process_text(&source, Some(path))?;
        if result.affected {
            write_atomic(path, &result.output)?;
            debug!(
                target: REWRITER_TARGET,
                snippet = self.snippet.name(),
                path = %path.display(),
                passes = result.passes,
                "rewrote file"
            );
        }
        Ok(result)
    }

    /// Runs one pass over the file at `path` without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Io`] when the file cannot be read, and the
    /// errors of [`test_source`](Self::test_source).
    pub fn test_file(&self, path: &Path) -> Result<TestResult, RewriteError> {
        let source = read_source(path)?;
        self.test_text(&source, Some(path))
    }

    /// Processes every file in parallel, returning results in input order.
    #[must_use]
    pub fn process_files(&self, paths: &[PathBuf]) -> Vec<Result<ProcessResult, RewriteError>> {
        paths
            .par_iter()
            .map(|path| self.process_file(path).inspect_err(|err| self.report(path, err)))
            .collect()
    }

    /// Tests every file in parallel, returning results in input order.
    #[must_use]
    pub fn test_files(&self, paths: &[PathBuf]) -> Vec<Result<TestResult, RewriteError>> {
        paths
            .par_iter()
            .map(|path| self.test_file(path).inspect_err(|err| self.report(path, err)))
            .collect()
    }

    fn report(&self, path: &Path, err: &RewriteError) {
        warn!(
            target: REWRITER_TARGET,
            snippet = self.snippet.name(),
            path = %path.display(),
            error = %err,
            "file failed"
        );
    }
}

fn read_source(path: &Path) -> Result<String, RewriteError> {
    fs::read_to_string(path).map_err(|err| RewriteError::io("read", path, err))
}

/// Writes `content` through a temporary file in the same directory, then
/// renames it over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<(), RewriteError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|err| RewriteError::io("write", path, err))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|err| RewriteError::io("write", path, err))?;
    temp_file
        .persist(path)
        .map_err(|err| RewriteError::io("write", path, err.error))?;
    Ok(())
}
