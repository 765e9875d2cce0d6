//! Conflict resolution and the per-file convergence loop.
//!
//! One pass parses the current text, runs the script against the root,
//! positions the recorded directives and resolves them: identical actions
//! collapse, overlapping ones are discarded in favour of the action that
//! sorts later, and the survivors are spliced into the text from the end
//! backwards. A pass that discarded anything triggers another pass over
//! the new text, which re-derives whatever edits still apply.

use std::collections::HashSet;
use std::path::Path;

use graft_syntax::Parser;
use tracing::debug;

use crate::action::{Action, ActionRecord};
use crate::config::{ConflictStrategy, RewriterConfig};
use crate::error::RewriteError;
use crate::instance::Instance;
use crate::snippet::Snippet;

/// Tracing target for pass-level events.
const MUTATION_TARGET: &str = "graft::mutation";

/// The actions of one pass after conflict resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Resolution {
    applied: Vec<Action>,
    discarded: Vec<Action>,
}

impl Resolution {
    /// Deduplicates, sorts and de-conflicts `actions`.
    pub(crate) fn new(mut actions: Vec<Action>) -> Self {
        let mut seen = HashSet::new();
        actions.retain(|action| {
            seen.insert((action.start(), action.end(), action.new_code().to_owned()))
        });
        actions.sort_by_key(|action| (action.start(), action.end()));

        let mut applied = Vec::with_capacity(actions.len());
        let mut discarded = Vec::new();
        let mut kept_start: Option<usize> = None;
        for action in actions.into_iter().rev() {
            if kept_start.is_some_and(|start| start < action.end()) {
                discarded.push(action);
            } else {
                kept_start = Some(action.start());
                applied.push(action);
            }
        }
        applied.reverse();
        discarded.reverse();
        Self { applied, discarded }
    }

    /// Returns the surviving actions in ascending order.
    pub(crate) fn applied(&self) -> &[Action] {
        &self.applied
    }

    /// Returns the actions dropped because they overlapped a survivor.
    pub(crate) fn discarded(&self) -> &[Action] {
        &self.discarded
    }

    /// Returns whether any action was dropped.
    pub(crate) fn conflicted(&self) -> bool {
        !self.discarded.is_empty()
    }

    /// Returns whether the pass produced any action at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.discarded.is_empty()
    }

    /// Returns caller-facing records of the surviving actions.
    pub(crate) fn records(&self) -> Vec<ActionRecord> {
        self.applied.iter().map(ActionRecord::from).collect()
    }

    /// Splices the surviving actions into `source`, last one first.
    pub(crate) fn apply(&self, source: &str) -> Result<String, RewriteError> {
        let mut output = source.to_owned();
        for action in self.applied.iter().rev() {
            if output.get(action.range()).is_none() {
                return Err(RewriteError::InvalidRange {
                    start: action.start(),
                    end: action.end(),
                    len: output.len(),
                });
            }
            output.replace_range(action.range(), action.new_code());
        }
        Ok(output)
    }
}

/// Runs one pass: parse, invoke, position and resolve.
pub(crate) fn run_pass(
    parser: &mut Parser,
    snippet: &Snippet,
    source: &str,
    file_path: Option<&Path>,
    config: &RewriterConfig,
) -> Result<Resolution, RewriteError> {
    let parsed = parser.parse(source)?;
    if config.reject_syntax_errors() {
        parsed.ensure_valid()?;
    }
    let mut instance = Instance::new(&parsed, file_path);
    snippet.run(&mut instance)?;
    let actions = instance.into_actions(config.tab_width())?;
    Ok(Resolution::new(actions))
}

/// The text a file converged to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Converged {
    pub(crate) output: String,
    pub(crate) passes: usize,
}

/// Repeats passes until one finishes without discarding an action.
pub(crate) fn run_to_convergence(
    parser: &mut Parser,
    snippet: &Snippet,
    source: &str,
    file_path: Option<&Path>,
    config: &RewriterConfig,
) -> Result<Converged, RewriteError> {
    let mut text = source.to_owned();
    let mut passes = 0;
    loop {
        passes += 1;
        let resolution = run_pass(parser, snippet, &text, file_path, config)?;
        debug!(
            target: MUTATION_TARGET,
            snippet = snippet.name(),
            pass = passes,
            applied = resolution.applied().len(),
            discarded = resolution.discarded().len(),
            "resolved pass"
        );
        if let (ConflictStrategy::FailFast, Some(first)) =
            (config.conflict_strategy(), resolution.discarded().first())
        {
            return Err(RewriteError::Conflict {
                start: first.start(),
                end: first.end(),
            });
        }
        if !resolution.applied().is_empty() {
            text = resolution.apply(&text)?;
        }
        if !resolution.conflicted() {
            return Ok(Converged {
                output: text,
                passes,
            });
        }
        if config
            .max_passes()
            .is_some_and(|max_passes| passes >= max_passes.get())
        {
            return Err(RewriteError::NonConvergence { passes });
        }
    }
}
