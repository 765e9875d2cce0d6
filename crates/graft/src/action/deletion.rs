use std::ops::Range;

use graft_syntax::SyntaxNode;

use super::hygiene::{squeeze_lines, tidy_deletion};
use super::{Action, ActionKind};
use crate::error::RewriteError;
use crate::value::covering_range;

pub(super) fn delete(node: SyntaxNode<'_>, paths: &[String]) -> Result<Action, RewriteError> {
    let range = tidy_deletion(node.source(), covering_range(node, paths)?);
    Ok(Action::new(
        ActionKind::Delete,
        range.start,
        range.end,
        String::new(),
    ))
}

/// Removes the node, taking its whole line span when the node is the only
/// thing on those lines.
pub(super) fn remove(node: SyntaxNode<'_>) -> Action {
    let source = node.source();
    let range = own_lines(node).map_or_else(
        || tidy_deletion(source, node.byte_range()),
        |lines| squeeze_lines(source, lines),
    );
    Action::new(ActionKind::Remove, range.start, range.end, String::new())
}

/// Returns the line span (newline included) when the trimmed lines hold
/// nothing but the node and at most one statement terminator.
fn own_lines(node: SyntaxNode<'_>) -> Option<Range<usize>> {
    let source = node.source();
    let line_start = source
        .get(..node.start_byte())?
        .rfind('\n')
        .map_or(0, |index| index + 1);
    let line_end = source
        .get(node.end_byte()..)?
        .find('\n')
        .map_or(source.len(), |index| node.end_byte() + index);
    let trimmed = source.get(line_start..line_end)?.trim();
    let text = node.text();
    let alone = trimmed == text
        || trimmed
            .strip_prefix(text)
            .and_then(|rest| {
                let mut chars = rest.chars();
                chars.next().filter(|_| chars.next().is_none())
            })
            .is_some_and(|rest| node.adapter().statement_terminators().contains(&rest));
    if !alone {
        return None;
    }
    let with_newline = if line_end < source.len() {
        line_end + 1
    } else {
        line_end
    };
    Some(line_start..with_newline)
}
