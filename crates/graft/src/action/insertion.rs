use graft_syntax::SyntaxNode;

use super::{Action, ActionKind, InsertAt, InsertOptions, indent_block};
use crate::error::RewriteError;
use crate::template::render;
use crate::value::child_range;

/// Positions code before the node's closing line, one level deeper than
/// the node itself.
pub(super) fn append(
    node: SyntaxNode<'_>,
    code: &str,
    tab_width: usize,
) -> Result<Action, RewriteError> {
    let indent = node.indent();
    let position = node
        .end_byte()
        .checked_sub(indent + 1)
        .ok_or(RewriteError::InvalidRange {
            start: node.end_byte(),
            end: node.end_byte(),
            len: node.source().len(),
        })?;
    let new_code = indent_block(&render(node, code), indent + tab_width);
    Ok(Action::new(ActionKind::Append, position, position, new_code))
}

/// Positions code just past the opening `{` and newline of the node's body.
pub(super) fn prepend(
    node: SyntaxNode<'_>,
    code: &str,
    tab_width: usize,
) -> Result<Action, RewriteError> {
    let body = node
        .adapter()
        .body(node)
        .ok_or_else(|| RewriteError::unresolved_path("body", node.kind()))?;
    let position = body.start_byte() + 2;
    let new_code = indent_block(&render(node, code), node.indent() + tab_width);
    Ok(Action::new(ActionKind::Prepend, position, position, new_code))
}

pub(super) fn insert(
    node: SyntaxNode<'_>,
    code: &str,
    options: &InsertOptions,
) -> Result<Action, RewriteError> {
    let range = match options.to.as_deref() {
        Some(path) => child_range(node, path)?,
        None => node.byte_range(),
    };
    let position = match options.at {
        InsertAt::Beginning => range.start,
        InsertAt::End => range.end,
    };
    Ok(Action::new(
        ActionKind::Insert,
        position,
        position,
        render(node, code),
    ))
}
