//! Attribute rules: nested field patterns compiled to comparator lists.
//!
//! A rule is written as a nested mapping from field names to expected
//! values, for example
//! `{"kind": "call_expression", "function": {"property": "bind"}}`.
//! Compiling flattens it once into `(path, comparator)` pairs such as
//! `function.property == "bind"`; matching resolves every path with the
//! value resolver and requires all comparators to hold.
//!
//! A trailing qualifier on a path selects the comparator: `not`, `in`,
//! `notIn`, `gt`, `gte`, `lt` and `lte`. Qualifier names are reserved and
//! never treated as field names.

use std::cmp::Ordering;
use std::fmt;

use graft_syntax::{SyntaxNode, Value};
use regex::Regex;
use serde_json::Value as Json;
use tracing::warn;

use crate::error::RewriteError;
use crate::pattern::Pattern;
use crate::value::resolve_segments;

/// Tracing target for rule compilation.
const RULE_TARGET: &str = "graft::rule";

/// The reserved qualifier keywords.
const QUALIFIERS: [&str; 7] = ["not", "in", "notIn", "gt", "gte", "lt", "lte"];

/// Expected value on the right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Expected {
    /// Source text, a node name or a scalar's string form.
    Text(String),
    /// An integer.
    Number(i64),
    /// A boolean.
    Bool(bool),
    /// Matches when the path does not resolve.
    Null,
    /// Tested against the actual value's text.
    Regex(Regex),
    /// A list, used by `in`/`notIn` and element-wise equality.
    List(Vec<Expected>),
}

impl Expected {
    /// Compiles a regular expression expectation.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::InvalidRule`] when `pattern` is not a valid
    /// regular expression.
    pub fn regex(pattern: &str) -> Result<Self, RewriteError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|err| RewriteError::invalid_rule(err.to_string()))
    }

    fn from_json(value: &Json) -> Result<Self, RewriteError> {
        match value {
            Json::Null => Ok(Self::Null),
            Json::Bool(flag) => Ok(Self::Bool(*flag)),
            Json::Number(number) => number.as_i64().map(Self::Number).ok_or_else(|| {
                RewriteError::invalid_rule(format!("only integers are supported, got {number}"))
            }),
            Json::String(text) => Ok(Self::Text(text.clone())),
            Json::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Json::Object(_) => Err(RewriteError::invalid_rule(
                "a qualifier expects a scalar or a list",
            )),
        }
    }
}

impl From<&str> for Expected {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Expected {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Expected {
    fn from(number: i64) -> Self {
        Self::Number(number)
    }
}

impl From<bool> for Expected {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<Regex> for Expected {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Expected {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// How an actual value is compared against an [`Expected`] one.
#[derive(Debug, Clone)]
pub(crate) enum Comparator {
    /// Equality, the default.
    Equals(Expected),
    /// Negated equality.
    Not(Expected),
    /// Equal to any list element.
    In(Expected),
    /// Equal to no list element.
    NotIn(Expected),
    /// Strictly greater than.
    Gt(Expected),
    /// Greater than or equal.
    Gte(Expected),
    /// Strictly less than.
    Lt(Expected),
    /// Less than or equal.
    Lte(Expected),
    /// Never holds; stands in for a path that failed to compile.
    Unsatisfiable,
}

impl Comparator {
    fn from_qualifier(qualifier: Option<&str>, expected: Expected) -> Self {
        match qualifier {
            Some("not") => Self::Not(expected),
            Some("in") => Self::In(expected),
            Some("notIn") => Self::NotIn(expected),
            Some("gt") => Self::Gt(expected),
            Some("gte") => Self::Gte(expected),
            Some("lt") => Self::Lt(expected),
            Some("lte") => Self::Lte(expected),
            _ => Self::Equals(expected),
        }
    }

    fn holds(&self, node: SyntaxNode<'_>, actual: Option<&Value<'_>>) -> bool {
        match self {
            Self::Equals(expected) => equals(node, actual, expected),
            Self::Not(expected) => !equals(node, actual, expected),
            Self::In(expected) => list_items(expected)
                .iter()
                .any(|item| equals(node, actual, item)),
            Self::NotIn(expected) => !list_items(expected)
                .iter()
                .any(|item| equals(node, actual, item)),
            Self::Gt(expected) => compare(actual, expected) == Some(Ordering::Greater),
            Self::Gte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(expected) => compare(actual, expected) == Some(Ordering::Less),
            Self::Lte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::Unsatisfiable => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Predicate {
    segments: Vec<String>,
    comparator: Comparator,
}

impl Predicate {
    /// Splits `path` into field segments and an optional final qualifier.
    ///
    /// Only the last segment may be a qualifier, and at least one field
    /// segment must precede it.
    fn new(path: &str, expected: Expected) -> Result<Self, RewriteError> {
        let mut segments: Vec<String> = path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        let qualifier = segments
            .last()
            .filter(|segment| QUALIFIERS.contains(&segment.as_str()))
            .cloned();
        if qualifier.is_some() {
            segments.pop();
        }
        if let Some(stacked) = segments
            .iter()
            .find(|segment| QUALIFIERS.contains(&segment.as_str()))
        {
            return Err(RewriteError::invalid_rule(format!(
                "`{path}` uses the qualifier `{stacked}` as a field"
            )));
        }
        if qualifier.is_some() && segments.is_empty() {
            return Err(RewriteError::invalid_rule(format!(
                "`{path}` qualifies no field"
            )));
        }
        Ok(Self {
            segments,
            comparator: Comparator::from_qualifier(qualifier.as_deref(), expected),
        })
    }

    /// A predicate that holds for no node.
    fn unsatisfiable(path: &str) -> Self {
        Self {
            segments: vec![path.to_owned()],
            comparator: Comparator::Unsatisfiable,
        }
    }

    fn holds(&self, node: SyntaxNode<'_>) -> bool {
        let actual = resolve_segments(node, &self.segments);
        self.comparator.holds(node, actual.as_ref())
    }
}

/// A compiled attribute rule.
///
/// # Example
///
/// ```
/// use graft::Rule;
/// use serde_json::json;
///
/// let from_json = Rule::from_json(&json!({
///     "kind": "class_declaration",
///     "name": "FooBar",
/// }))?;
/// let built = Rule::new()
///     .with("kind", "class_declaration")
///     .with("name", "FooBar");
/// assert_eq!(from_json.len(), built.len());
/// # Ok::<(), graft::RewriteError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rule {
    predicates: Vec<Predicate>,
}

impl Rule {
    /// Creates an empty rule, which matches every node.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Adds a comparison for a dotted path.
    ///
    /// A trailing qualifier segment (`name.not`, `arguments.length.gt`)
    /// selects the comparator; otherwise the comparison is equality. A path
    /// that [`Rule::try_with`] would reject, such as `name.not.in`, is
    /// logged and makes the rule match nothing.
    #[must_use]
    pub fn with(mut self, path: &str, expected: impl Into<Expected>) -> Self {
        let predicate = Predicate::new(path, expected.into()).unwrap_or_else(|err| {
            warn!(target: RULE_TARGET, path, error = %err, "rule path never matches");
            Predicate::unsatisfiable(path)
        });
        self.predicates.push(predicate);
        self
    }

    /// Adds a comparison for a dotted path, rejecting malformed paths.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::InvalidRule`] when a qualifier appears
    /// anywhere but the last segment, or qualifies no field at all.
    pub fn try_with(
        mut self,
        path: &str,
        expected: impl Into<Expected>,
    ) -> Result<Self, RewriteError> {
        self.predicates.push(Predicate::new(path, expected.into())?);
        Ok(self)
    }

    /// Compiles a nested JSON mapping.
    ///
    /// Nested objects extend the path. Arrays compare element-wise through
    /// numeric indices and also pin the `length`. An object whose only key
    /// is a qualifier applies that qualifier to the enclosing path.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::InvalidRule`] when the top level is not an
    /// object, when a qualifier object carries more than one key, or when
    /// a value cannot be expressed as an [`Expected`].
    pub fn from_json(value: &Json) -> Result<Self, RewriteError> {
        if !value.is_object() {
            return Err(RewriteError::invalid_rule("a rule must be an object"));
        }
        let mut rule = Self::new();
        flatten("", value, &mut rule.predicates)?;
        Ok(rule)
    }

    /// Returns the number of compiled comparisons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns whether the rule has no comparisons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Pattern for Rule {
    fn matches(&self, node: SyntaxNode<'_>) -> bool {
        self.predicates.iter().all(|predicate| predicate.holds(node))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<_> = self
            .predicates
            .iter()
            .map(|predicate| predicate.segments.join("."))
            .collect();
        write!(f, "rule({})", paths.join(", "))
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten(prefix: &str, value: &Json, out: &mut Vec<Predicate>) -> Result<(), RewriteError> {
    match value {
        Json::Object(map) => {
            let qualifiers: Vec<_> = map
                .keys()
                .filter(|key| QUALIFIERS.contains(&key.as_str()))
                .collect();
            match (qualifiers.as_slice(), map.len()) {
                ([], _) => {
                    for (key, nested) in map {
                        flatten(&join_path(prefix, key), nested, out)?;
                    }
                    Ok(())
                }
                ([qualifier], 1) if !prefix.is_empty() => {
                    let nested = map.get(qualifier.as_str()).unwrap_or(&Json::Null);
                    out.push(Predicate::new(
                        &join_path(prefix, qualifier),
                        Expected::from_json(nested)?,
                    )?);
                    Ok(())
                }
                _ => Err(RewriteError::invalid_rule(format!(
                    "`{prefix}` mixes qualifiers with other keys"
                ))),
            }
        }
        Json::Array(items) => {
            let length = i64::try_from(items.len())
                .map_err(|err| RewriteError::invalid_rule(err.to_string()))?;
            out.push(Predicate::new(
                &join_path(prefix, "length"),
                Expected::Number(length),
            )?);
            for (index, item) in items.iter().enumerate() {
                flatten(&join_path(prefix, &index.to_string()), item, out)?;
            }
            Ok(())
        }
        scalar => {
            out.push(Predicate::new(prefix, Expected::from_json(scalar)?)?);
            Ok(())
        }
    }
}

fn list_items(expected: &Expected) -> &[Expected] {
    match expected {
        Expected::List(items) => items,
        single => std::slice::from_ref(single),
    }
}

fn equals(node: SyntaxNode<'_>, actual: Option<&Value<'_>>, expected: &Expected) -> bool {
    match (actual, expected) {
        (None, Expected::Null) => true,
        (None, _) | (Some(_), Expected::Null) => false,
        (Some(Value::Nodes(nodes)), Expected::List(items)) => {
            nodes.len() == items.len()
                && nodes
                    .iter()
                    .zip(items)
                    .all(|(child, item)| node_equals(*child, item))
        }
        (Some(Value::Nodes(nodes)), _) => {
            span_text(node, nodes).is_some_and(|text| text_equals(text, expected))
        }
        (Some(Value::Node(child)), _) => node_equals(*child, expected),
        (Some(Value::Text(text)), _) => text_equals(text, expected),
        (Some(Value::Number(number)), Expected::Number(other)) => number == other,
        (Some(Value::Number(number)), _) => text_equals(&number.to_string(), expected),
        (Some(Value::Bool(flag)), Expected::Bool(other)) => flag == other,
        (Some(Value::Bool(flag)), _) => text_equals(&flag.to_string(), expected),
    }
}

fn node_equals(node: SyntaxNode<'_>, expected: &Expected) -> bool {
    if text_equals(node.text(), expected) {
        return true;
    }
    match expected {
        Expected::Text(text) => {
            node.name_text() == Some(text.as_str())
                || (node.adapter().is_self_reference(node.kind()) && node.kind() == text)
        }
        _ => false,
    }
}

fn text_equals(text: &str, expected: &Expected) -> bool {
    match expected {
        Expected::Text(other) => text == other,
        Expected::Regex(regex) => regex.is_match(text),
        Expected::Number(number) => text.trim().parse::<i64>().ok() == Some(*number),
        Expected::Bool(flag) => text == flag.to_string(),
        Expected::Null | Expected::List(_) => false,
    }
}

fn span_text<'t>(node: SyntaxNode<'t>, nodes: &[SyntaxNode<'t>]) -> Option<&'t str> {
    let (first, last) = (nodes.first()?, nodes.last()?);
    node.source().get(first.start_byte()..last.end_byte())
}

fn compare(actual: Option<&Value<'_>>, expected: &Expected) -> Option<Ordering> {
    let value = actual?;
    match expected {
        Expected::Number(number) => actual_number(value).map(|found| found.cmp(number)),
        Expected::Text(text) => actual_text(value).map(|found| found.as_str().cmp(text)),
        Expected::Bool(_) | Expected::Null | Expected::Regex(_) | Expected::List(_) => None,
    }
}

fn actual_number(actual: &Value<'_>) -> Option<i64> {
    match actual {
        Value::Number(number) => Some(*number),
        Value::Node(node) => node.text().trim().parse().ok(),
        Value::Text(text) => text.trim().parse().ok(),
        Value::Nodes(_) | Value::Bool(_) => None,
    }
}

fn actual_text(actual: &Value<'_>) -> Option<String> {
    match actual {
        Value::Node(node) => Some(node.text().to_owned()),
        Value::Text(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Nodes(_) | Value::Bool(_) => None,
    }
}
