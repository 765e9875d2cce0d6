use graft_syntax::SyntaxNode;

use super::{Action, ActionKind, ReplaceWithOptions};
use crate::error::RewriteError;
use crate::template::render;
use crate::value::covering_range;

pub(super) fn replace(
    node: SyntaxNode<'_>,
    paths: &[String],
    code: &str,
) -> Result<Action, RewriteError> {
    let range = covering_range(node, paths)?;
    Ok(Action::new(
        ActionKind::Replace,
        range.start,
        range.end,
        render(node, code),
    ))
}

/// Replaces the whole node.
///
/// With auto-indent, continuation lines of the rendering are shifted to the
/// node's start column. Without it the range starts at the beginning of the
/// line and the rendering supplies its own indentation.
pub(super) fn replace_with(
    node: SyntaxNode<'_>,
    code: &str,
    options: ReplaceWithOptions,
) -> Action {
    let rendered = render(node, code);
    let column = node.start_position().column;
    if !options.auto_indent {
        let line_start = node.start_byte().saturating_sub(column);
        return Action::new(ActionKind::ReplaceWith, line_start, node.end_byte(), rendered);
    }
    let padding = " ".repeat(column);
    let new_code = rendered
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 || line.is_empty() {
                line.to_owned()
            } else {
                format!("{padding}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    Action::new(
        ActionKind::ReplaceWith,
        node.start_byte(),
        node.end_byte(),
        new_code,
    )
}

/// Prefixes every line of the node with the adapter's line-comment marker,
/// aligned on the smallest indentation the lines share.
///
/// The first line counts as indented to the node's start column. When code
/// precedes the node on that line, the splice starts at the node and its
/// first line takes the marker directly.
pub(super) fn comment_out(node: SyntaxNode<'_>) -> Action {
    let source = node.source();
    let column = node.start_position().column;
    let line_start = node.start_byte().saturating_sub(column);
    let prefix = source.get(line_start..node.start_byte()).unwrap_or_default();
    let inline = !prefix.trim().is_empty();
    let (start, text) = if inline {
        (node.start_byte(), format!("{}{}", " ".repeat(column), node.text()))
    } else {
        (line_start, format!("{prefix}{}", node.text()))
    };

    let indent_of = |line: &str| line.len() - line.trim_start().len();
    let lines: Vec<&str> = text.split('\n').collect();
    let shared = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_of(line))
        .min()
        .unwrap_or(0);
    let marker = node.adapter().line_comment();
    let new_code = lines
        .iter()
        .enumerate()
        .map(|(index, line)| match (line.get(..shared), line.get(shared..)) {
            (Some(_), Some(_)) if inline && index == 0 => {
                format!("{marker} {}", line.trim_start())
            }
            (Some(head), Some(tail)) if !line.trim().is_empty() => {
                format!("{head}{marker} {tail}")
            }
            _ => (*line).to_owned(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Action::new(ActionKind::CommentOut, start, node.end_byte(), new_code)
}
