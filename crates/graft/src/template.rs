//! `{{path}}` placeholder expansion.
//!
//! Every placeholder is resolved against the target node with the value
//! resolver. When any placeholder fails to resolve the template is returned
//! untouched, so a mistyped path shows up verbatim in the output rather
//! than as a half-substituted rewrite.

use std::sync::LazyLock;

use graft_syntax::{SyntaxNode, Value};
use regex::{Captures, Regex};

use crate::value::resolve;

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").ok());

/// Expands the placeholders of `template` against `node`.
#[must_use]
pub fn render(node: SyntaxNode<'_>, template: &str) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return template.to_owned();
    };
    let mut unresolved = false;
    let rendered = placeholder.replace_all(template, |captures: &Captures<'_>| {
        let path = captures.get(1).map_or("", |path| path.as_str().trim());
        substitution(node, path).unwrap_or_else(|| {
            unresolved = true;
            String::new()
        })
    });
    if unresolved {
        template.to_owned()
    } else {
        rendered.into_owned()
    }
}

fn substitution(node: SyntaxNode<'_>, path: &str) -> Option<String> {
    match resolve(node, path)? {
        Value::Node(child) => Some(child.text().to_owned()),
        Value::Nodes(children) => match (children.first(), children.last()) {
            (Some(first), Some(last)) => node
                .source()
                .get(first.start_byte()..last.end_byte())
                .map(str::to_owned),
            _ => Some(String::new()),
        },
        Value::Text(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
    }
}
