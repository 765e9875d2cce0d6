//! Value resolution along dotted child paths.
//!
//! One routine serves the rule matcher, the template renderer and
//! `goto_node`: walk the path one segment at a time, asking the current
//! node for a grammar field or accessor of that name. Any failed step turns
//! the whole resolution into `None`; no partial result survives.

use std::ops::Range;

use graft_syntax::{SyntaxNode, Value};

use crate::error::RewriteError;

/// Resolves a dotted `path` against `node`.
///
/// An empty path resolves to the node itself.
#[must_use]
pub fn resolve<'t>(node: SyntaxNode<'t>, path: &str) -> Option<Value<'t>> {
    if path.is_empty() {
        return Some(Value::Node(node));
    }
    resolve_segments(node, path.split('.'))
}

/// Resolves pre-split path segments against `node`.
pub fn resolve_segments<'t, I, S>(node: SyntaxNode<'t>, segments: I) -> Option<Value<'t>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .try_fold(Value::Node(node), |value, segment| step(value, segment.as_ref()))
}

fn step<'t>(value: Value<'t>, segment: &str) -> Option<Value<'t>> {
    match value {
        Value::Node(node) => node.field(segment),
        Value::Nodes(nodes) => match segment {
            "length" => i64::try_from(nodes.len()).ok().map(Value::Number),
            "first" => nodes.first().copied().map(Value::Node),
            "last" => nodes.last().copied().map(Value::Node),
            _ => {
                let index = segment.parse::<usize>().ok()?;
                nodes.get(index).copied().map(Value::Node)
            }
        },
        Value::Text(text) if segment == "length" => {
            i64::try_from(text.chars().count()).ok().map(Value::Number)
        }
        Value::Text(_) | Value::Number(_) | Value::Bool(_) => None,
    }
}

/// Resolves a child path to the byte range it covers.
///
/// A list of nodes covers the span from its first element's start to its
/// last element's end.
///
/// # Errors
///
/// Returns [`RewriteError::UnresolvedPath`] when the path does not resolve
/// to at least one node.
pub fn child_range(node: SyntaxNode<'_>, path: &str) -> Result<Range<usize>, RewriteError> {
    let unresolved = || RewriteError::unresolved_path(path, node.kind());
    match resolve(node, path).ok_or_else(unresolved)? {
        Value::Node(child) => Ok(child.byte_range()),
        Value::Nodes(children) => match (children.first(), children.last()) {
            (Some(first), Some(last)) => Ok(first.start_byte()..last.end_byte()),
            _ => Err(unresolved()),
        },
        Value::Text(_) | Value::Number(_) | Value::Bool(_) => Err(unresolved()),
    }
}

/// Resolves several child paths to the smallest range covering all of them.
///
/// # Errors
///
/// Returns [`RewriteError::UnresolvedPath`] for the first path that does
/// not resolve, or when `paths` is empty.
pub fn covering_range<S: AsRef<str>>(
    node: SyntaxNode<'_>,
    paths: &[S],
) -> Result<Range<usize>, RewriteError> {
    let mut covering: Option<Range<usize>> = None;
    for path in paths {
        let range = child_range(node, path.as_ref())?;
        covering = Some(match covering {
            Some(current) => current.start.min(range.start)..current.end.max(range.end),
            None => range,
        });
    }
    covering.ok_or_else(|| RewriteError::unresolved_path("", node.kind()))
}

#[cfg(test)]
mod tests {
    use graft_syntax::{Parser, SupportedLanguage};

    use super::*;

    fn parse(source: &str) -> graft_syntax::ParseResult {
        Parser::new(SupportedLanguage::TypeScript)
            .expect("parser init")
            .parse(source)
            .expect("parse")
    }

    #[test]
    fn resolve_walks_fields_and_accessors() {
        let parsed = parse("!!foobar");
        let statement = *parsed.root().children().first().expect("statement");

        let value = resolve(statement, "expression.argument.argument").expect("resolves");
        assert_eq!(value.as_node().map(|node| node.text()), Some("foobar"));
    }

    #[test]
    fn resolve_discards_partial_prefix_on_failure() {
        let parsed = parse("!!foobar");
        let statement = *parsed.root().children().first().expect("statement");

        assert_eq!(resolve(statement, "expression.argument.missing"), None);
    }

    #[test]
    fn resolve_indexes_node_lists() {
        let parsed = parse("foo(a, b);");
        let statement = *parsed.root().children().first().expect("statement");

        let second = resolve(statement, "expression.arguments.elements.1").expect("resolves");
        assert_eq!(second.as_node().map(|node| node.text()), Some("b"));
        assert_eq!(
            resolve(statement, "expression.arguments.elements.length"),
            Some(Value::Number(2))
        );
    }

    #[test]
    fn child_range_spans_node_lists() {
        let parsed = parse("foo(a, b);");
        let statement = *parsed.root().children().first().expect("statement");

        let range = child_range(statement, "expression.arguments.elements").expect("range");
        assert_eq!(range, 4..8);
    }

    #[test]
    fn child_range_rejects_unknown_paths() {
        let parsed = parse("foo(a, b);");
        let statement = *parsed.root().children().first().expect("statement");

        let err = child_range(statement, "expression.nope").expect_err("unresolved");
        assert!(matches!(err, RewriteError::UnresolvedPath { .. }));
        assert_eq!(err.to_string(), "expression.nope is not supported for expression_statement");
    }

    #[test]
    fn covering_range_takes_min_and_max() {
        let parsed = parse("this.foo.bind(this)");
        let statement = *parsed.root().children().first().expect("statement");

        let range = covering_range(
            statement,
            &[
                "expression.function.object.dot",
                "expression.function.property",
                "expression.arguments",
            ],
        )
        .expect("range");
        assert_eq!(range, 4..19);
    }
}
