//! Positioning tests for every directive kind.

use graft_syntax::{ParseResult, Parser, SupportedLanguage, SyntaxNode};
use rstest::rstest;

use super::*;
use crate::value::resolve;

fn parse(language: SupportedLanguage, source: &str) -> ParseResult {
    Parser::new(language)
        .expect("parser init")
        .parse(source)
        .expect("parse")
}

fn node_at<'t>(parsed: &'t ParseResult, path: &str) -> SyntaxNode<'t> {
    resolve(parsed.root(), path)
        .and_then(|value| value.as_node())
        .expect("path resolves to a node")
}

fn rewrite(parsed: &ParseResult, path: &str, kind: DirectiveKind) -> String {
    let action = Directive::new(node_at(parsed, path), kind)
        .position(2)
        .expect("positions");
    let mut output = parsed.source().to_owned();
    output.replace_range(action.range(), action.new_code());
    output
}

fn ts(source: &str) -> ParseResult {
    parse(SupportedLanguage::TypeScript, source)
}

#[test]
fn append_adds_an_indented_member_before_the_closing_brace() {
    let parsed = ts("class Foo {\n  bar() {}\n}");
    let output = rewrite(&parsed, "0", DirectiveKind::Append("baz() {}".to_owned()));
    assert_eq!(output, "class Foo {\n  bar() {}\n  baz() {}\n}");
}

#[test]
fn append_indents_every_line_of_a_block() {
    let parsed = ts("class Foo {\n}");
    let output = rewrite(
        &parsed,
        "0",
        DirectiveKind::Append("baz() {\n  return 1;\n}".to_owned()),
    );
    assert_eq!(output, "class Foo {\n  baz() {\n    return 1;\n  }\n}");
}

#[test]
fn prepend_adds_code_after_the_opening_line() {
    let parsed = ts("class Foo {\n  bar() {}\n}");
    let output = rewrite(&parsed, "0", DirectiveKind::Prepend("baz() {}".to_owned()));
    assert_eq!(output, "class Foo {\n  baz() {}\n  bar() {}\n}");
}

#[test]
fn prepend_requires_a_body() {
    let parsed = ts("foo();");
    let err = Directive::new(node_at(&parsed, "0"), DirectiveKind::Prepend("x".to_owned()))
        .position(2)
        .expect_err("no body");
    assert_eq!(err.to_string(), "body is not supported for expression_statement");
}

#[rstest]
#[case::end_of_child(InsertOptions::at(InsertAt::End).to("expression.arguments.elements"), ", b", "foo(a, b);")]
#[case::beginning_of_node(InsertOptions::at(InsertAt::Beginning), "await ", "await foo(a);")]
#[case::default_is_end(InsertOptions::default().to("expression.function"), "Bar", "fooBar(a);")]
fn insert_places_raw_code(
    #[case] options: InsertOptions,
    #[case] code: &str,
    #[case] expected: &str,
) {
    let parsed = ts("foo(a);");
    let output = rewrite(
        &parsed,
        "0",
        DirectiveKind::Insert {
            code: code.to_owned(),
            options,
        },
    );
    assert_eq!(output, expected);
}

#[test]
fn delete_truncates_member_chain() {
    let parsed = ts("this.foo.bind(this)");
    let output = rewrite(
        &parsed,
        "0.expression",
        DirectiveKind::Delete(vec![
            "function.object.dot".to_owned(),
            "function.property".to_owned(),
            "arguments".to_owned(),
        ]),
    );
    assert_eq!(output, "this");
}

#[test]
fn delete_swallows_the_trailing_comma() {
    let parsed = ts("foo(a, b, c);");
    let output = rewrite(
        &parsed,
        "0",
        DirectiveKind::Delete(vec!["expression.arguments.elements.1".to_owned()]),
    );
    assert_eq!(output, "foo(a, c);");
}

#[test]
fn delete_rejects_unknown_paths() {
    let parsed = ts("foo(a);");
    let err = Directive::new(
        node_at(&parsed, "0"),
        DirectiveKind::Delete(vec!["expression.nope".to_owned()]),
    )
    .position(2)
    .expect_err("unresolved");
    assert!(matches!(err, RewriteError::UnresolvedPath { .. }));
}

#[test]
fn remove_takes_the_whole_line() {
    let parsed = ts("function foo() {\n  bar();\n}");
    let output = rewrite(&parsed, "0.body.0", DirectiveKind::Remove);
    assert_eq!(output, "function foo() {\n}");
}

#[test]
fn remove_squeezes_surrounding_blank_lines() {
    let parsed = ts("a();\n\nb();\n\nc();\n");
    let output = rewrite(&parsed, "1", DirectiveKind::Remove);
    assert_eq!(output, "a();\n\nc();\n");
}

#[test]
fn remove_inside_a_line_applies_hygiene() {
    let parsed = ts("foo(a, b);");
    let output = rewrite(&parsed, "0.expression.arguments.elements.1", DirectiveKind::Remove);
    assert_eq!(output, "foo(a);");
}

#[test]
fn remove_accepts_a_trailing_list_separator() {
    let parsed = parse(SupportedLanguage::Python, "foo(\n    a,\n    b,\n)\n");
    let output = rewrite(
        &parsed,
        "0.0.arguments.elements.0",
        DirectiveKind::Remove,
    );
    assert_eq!(output, "foo(\n    b,\n)\n");
}

#[test]
fn replace_renders_into_child_range() {
    let parsed = ts("class FooBar {}");
    let output = rewrite(
        &parsed,
        "0",
        DirectiveKind::Replace {
            paths: vec!["name".to_owned()],
            code: "Synvert".to_owned(),
        },
    );
    assert_eq!(output, "class Synvert {}");
}

#[test]
fn replace_with_renders_the_template() {
    let parsed = ts("!!foobar");
    let output = rewrite(
        &parsed,
        "0",
        DirectiveKind::ReplaceWith {
            code: "Boolean({{expression.argument.argument}})".to_owned(),
            options: ReplaceWithOptions::default(),
        },
    );
    assert_eq!(output, "Boolean(foobar)");
}

#[test]
fn replace_with_reindents_continuation_lines() {
    let parsed = ts("if (x) {\n  foo();\n}");
    let output = rewrite(
        &parsed,
        "0.consequence.0",
        DirectiveKind::ReplaceWith {
            code: "bar();\nbaz();".to_owned(),
            options: ReplaceWithOptions::default(),
        },
    );
    assert_eq!(output, "if (x) {\n  bar();\n  baz();\n}");
}

#[test]
fn replace_with_without_auto_indent_starts_at_column_zero() {
    let parsed = ts("if (x) {\n  foo();\n}");
    let output = rewrite(
        &parsed,
        "0.consequence.0",
        DirectiveKind::ReplaceWith {
            code: "    qux();".to_owned(),
            options: ReplaceWithOptions { auto_indent: false },
        },
    );
    assert_eq!(output, "if (x) {\n    qux();\n}");
}

#[test]
fn comment_out_aligns_markers_on_the_shared_indent() {
    let parsed = ts("if (x) {\n  foo(1,\n    2);\n}");
    let output = rewrite(&parsed, "0.consequence.0", DirectiveKind::CommentOut);
    assert_eq!(output, "if (x) {\n  // foo(1,\n  //   2);\n}");
}

#[test]
fn comment_out_pads_a_node_that_starts_mid_line() {
    let parsed = ts("foo(a, {\n    b: 1,\n  });");
    let output = rewrite(
        &parsed,
        "0.expression.arguments.elements.1",
        DirectiveKind::CommentOut,
    );
    assert_eq!(output, "foo(a, // {\n  //   b: 1,\n  // });");
}

#[test]
fn comment_out_uses_the_language_marker() {
    let parsed = parse(SupportedLanguage::Python, "x = 1\n");
    let output = rewrite(&parsed, "0", DirectiveKind::CommentOut);
    assert_eq!(output, "# x = 1\n");
}

#[test]
fn positioning_twice_yields_the_same_action() {
    let parsed = ts("foo(a, b, c);");
    let directive = Directive::new(
        node_at(&parsed, "0"),
        DirectiveKind::Delete(vec!["expression.arguments.elements.1".to_owned()]),
    );
    let first = directive.position(2).expect("positions");
    let second = directive.position(2).expect("positions");
    assert_eq!(first, second);
    assert_eq!(first.range(), 7..10);
}

#[rstest]
#[case::append(DirectiveKind::Append("x();".to_owned()))]
#[case::prepend(DirectiveKind::Prepend("x();".to_owned()))]
#[case::remove(DirectiveKind::Remove)]
#[case::comment_out(DirectiveKind::CommentOut)]
#[case::replace_with(DirectiveKind::ReplaceWith {
    code: "y();".to_owned(),
    options: ReplaceWithOptions { auto_indent: false },
})]
fn actions_stay_inside_the_source(#[case] kind: DirectiveKind) {
    let parsed = ts("function foo() {\n  bar();\n}");
    let action = Directive::new(node_at(&parsed, "0"), kind)
        .position(2)
        .expect("positions");
    assert!(action.start() <= action.end());
    assert!(action.end() <= parsed.source().len());
}

#[test]
fn overlapping_ranges_are_detected() {
    let outer = Action::new(ActionKind::Remove, 0, 10, String::new());
    let inner = Action::new(ActionKind::Replace, 4, 6, "x".to_owned());
    let touching = Action::new(ActionKind::Insert, 10, 10, "y".to_owned());
    assert!(outer.overlaps(&inner));
    assert!(!outer.overlaps(&touching));
}
