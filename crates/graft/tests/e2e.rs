//! End-to-end tests for graft using insta for snapshot testing.
//!
//! These tests drive the public API the way a caller would: build a
//! snippet, hand it to a [`Rewriter`] and inspect the results, both for
//! in-memory sources and for files on disk.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use graft::{
    ConflictStrategy, InsertAt, InsertOptions, RewriteError, Rewriter, RewriterConfig, Rule,
    Snippet, predicate,
};
use graft_syntax::{SupportedLanguage, SyntaxError};
use insta::{assert_debug_snapshot, assert_snapshot};
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;

fn rewriter(snippet: Snippet) -> Rewriter {
    Rewriter::new(snippet).with_language(SupportedLanguage::TypeScript)
}

/// Renames every call's callee to `renamed`.
fn rename_calls() -> Snippet {
    Snippet::new("rename-calls", |instance| {
        let rule = Rule::new().with("kind", "call_expression");
        instance.within_node(&rule, |instance| {
            instance.replace(["function"], "renamed");
            Ok(())
        })
    })
}

/// Removes the statement `a(1);` and renames every callee in one pass.
fn remove_and_rename() -> Snippet {
    Snippet::new("remove-and-rename", |instance| {
        let statement = Rule::new()
            .with("kind", "expression_statement")
            .with("text", "a(1);");
        instance.within_node(&statement, |instance| {
            instance.remove();
            Ok(())
        })?;
        let calls = Rule::new().with("kind", "call_expression");
        instance.within_node(&calls, |instance| {
            instance.replace(["function"], "c");
            Ok(())
        })
    })
}

/// Writes two competing replacements for every callee, forever.
fn never_settles() -> Snippet {
    Snippet::new("never-settles", |instance| {
        let rule = Rule::new().with("kind", "call_expression");
        instance.within_node(&rule, |instance| {
            instance.replace(["function"], "a");
            instance.replace(["function"], "b");
            Ok(())
        })
    })
}

// =============================================================================
// Happy Path: Scenarios
// =============================================================================

#[test]
fn snapshot_rename_class() {
    let rule = Rule::from_json(&json!({"kind": "class_declaration", "name": "FooBar"}))
        .unwrap_or_else(|err| panic!("rule: {err}"));
    let snippet = Snippet::new("rename-class", move |instance| {
        instance.within_node(&rule, |instance| {
            instance.replace(["name"], "Synvert");
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .process_source("class FooBar {}")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_debug_snapshot!(result, @r#"
    ProcessResult {
        file_path: None,
        affected: true,
        passes: 1,
        output: "class Synvert {}",
    }
    "#);
}

#[test]
fn delete_truncates_a_call_chain() {
    let snippet = Snippet::new("unbind", |instance| {
        let rule = Rule::new()
            .with("kind", "call_expression")
            .with("function.property", "bind");
        instance.within_node(&rule, |instance| {
            instance.delete_node(["function.object.dot", "function.property", "arguments"]);
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .process_source("this.foo.bind(this)")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_snapshot!(result.output, @"this");
}

#[test]
fn remove_collapses_an_emptied_body() {
    let snippet = Snippet::new("remove-call", |instance| {
        let rule = Rule::new().with("kind", "expression_statement");
        instance.within_node(&rule, |instance| {
            instance.remove();
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .process_source("function foo() {\n  bar();\n}\n")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_eq!(result.output, "function foo() {\n}\n");
}

#[test]
fn replace_with_renders_a_template() {
    let snippet = Snippet::new("double-negation", |instance| {
        let rule = Rule::new()
            .with("kind", "unary_expression")
            .with("argument.kind", "unary_expression");
        instance.within_node(&rule, |instance| {
            instance.replace_with("Boolean({{argument.argument}})");
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .process_source("!!foobar")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_snapshot!(result.output, @"Boolean(foobar)");
}

#[test]
fn snapshot_conflicting_pass() {
    let result = rewriter(remove_and_rename())
        .test_source("a(1);\nb(2);\n")
        .unwrap_or_else(|err| panic!("test: {err}"));
    assert_debug_snapshot!(result, @r#"
    TestResult {
        file_path: None,
        affected: true,
        conflicted: true,
        actions: [
            ActionRecord {
                start: 0,
                end: 6,
                new_code: "",
            },
            ActionRecord {
                start: 6,
                end: 7,
                new_code: "c",
            },
        ],
    }
    "#);
}

#[test]
fn conflicts_resolve_on_the_next_pass() {
    let result = rewriter(remove_and_rename())
        .process_source("a(1);\nb(2);\n")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_eq!(result.output, "c(2);\n");
    assert_eq!(result.passes, 2);
}

#[test]
fn append_indents_into_the_block() {
    let snippet = Snippet::new("add-method", |instance| {
        let rule = Rule::new().with("kind", "class_declaration");
        instance.within_node(&rule, |instance| {
            instance.append("bar() {}");
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .process_source("class Foo {\n  foo() {}\n}\n")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_eq!(result.output, "class Foo {\n  foo() {}\n  bar() {}\n}\n");
}

#[test]
fn comment_out_uses_the_language_marker() {
    let snippet = Snippet::new("disable", |instance| {
        let rule = Rule::new().with("kind", "expression_statement");
        instance.within_node(&rule, |instance| {
            instance.comment_out();
            Ok(())
        })
    });
    let result = Rewriter::new(snippet)
        .with_language(SupportedLanguage::Python)
        .process_source("def f():\n    g()\n")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_eq!(result.output, "def f():\n    # g()\n");
}

// =============================================================================
// Properties
// =============================================================================

#[rstest]
#[case::unknown_field("{{nope}}")]
#[case::partially_known("{{function}}({{nope}})")]
#[case::unknown_index("{{arguments.7}}")]
fn unresolved_templates_stay_verbatim(#[case] template: &'static str) {
    let snippet = Snippet::new("template", move |instance| {
        let rule = Rule::new().with("kind", "call_expression");
        instance.within_node(&rule, |instance| {
            instance.replace_with(template);
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .test_source("f(x);")
        .unwrap_or_else(|err| panic!("test: {err}"));
    let codes: Vec<_> = result.actions.iter().map(|action| action.new_code.as_str()).collect();
    assert_eq!(codes, vec![template]);
}

#[fixture]
fn crowded() -> &'static str {
    "foo(a, b);\nbar(baz(1), [2, 3]);\nconst x = { y: 1 };\n"
}

#[rstest]
fn surviving_actions_are_in_bounds_and_disjoint(crowded: &'static str) {
    let snippet = Snippet::new("everything", |instance| {
        let every = predicate(|node| node.kind() != "program");
        instance.within_node(&every, |instance| {
            instance.remove();
            instance.insert("/*x*/", InsertOptions::at(InsertAt::Beginning));
            Ok(())
        })
    });
    let result = rewriter(snippet)
        .test_source(crowded)
        .unwrap_or_else(|err| panic!("test: {err}"));
    assert!(result.conflicted);
    for action in &result.actions {
        assert!(action.start <= action.end, "{action:?}");
        assert!(action.end <= crowded.len(), "{action:?}");
    }
    for pair in result.actions.windows(2) {
        if let [left, right] = pair {
            assert!(left.end <= right.start, "{left:?} overlaps {right:?}");
        }
    }
}

#[rstest]
#[case::typescript(SupportedLanguage::TypeScript, "function f() {\n  return g(1);\n}\n")]
#[case::rust(SupportedLanguage::Rust, "fn main() {\n    let x = 1;\n}\n")]
#[case::python(SupportedLanguage::Python, "def f():\n    return 1\n")]
fn unmatched_scripts_leave_text_untouched(
    #[case] language: SupportedLanguage,
    #[case] source: &str,
) {
    let snippet = Snippet::new("nothing", |instance| {
        let rule = Rule::new().with("kind", "no_such_kind");
        instance.within_node(&rule, |instance| {
            instance.remove();
            Ok(())
        })
    });
    let rewriter = Rewriter::new(snippet).with_language(language);
    let processed = rewriter
        .process_source(source)
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert!(!processed.affected);
    assert_eq!(processed.passes, 1);
    assert_eq!(processed.output, source);

    let tested = rewriter
        .test_source(source)
        .unwrap_or_else(|err| panic!("test: {err}"));
    assert!(!tested.affected);
    assert!(tested.actions.is_empty());
}

#[test]
fn stable_rewrites_converge_within_two_passes() {
    let result = rewriter(rename_calls())
        .process_source("a(b(1));\nc(d(2), e(3));\n")
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert!(result.passes <= 2, "took {} passes", result.passes);
    assert_eq!(
        result.output,
        "renamed(renamed(1));\nrenamed(renamed(2), renamed(3));\n"
    );
}

// =============================================================================
// Unhappy Path: Configuration and Errors
// =============================================================================

#[test]
fn fail_fast_reports_the_discarded_action() {
    let config = RewriterConfig::default().with_conflict_strategy(ConflictStrategy::FailFast);
    let err = rewriter(remove_and_rename())
        .with_config(config)
        .process_source("a(1);\nb(2);\n")
        .expect_err("conflict should fail fast");
    assert_snapshot!(err.to_string(), @"conflicting actions at bytes 0..1");
}

#[test]
fn pass_limit_stops_a_script_that_never_settles() {
    let limit = NonZeroUsize::new(3).unwrap_or_else(|| panic!("non-zero"));
    let config = RewriterConfig::default().with_max_passes(limit);
    let err = rewriter(never_settles())
        .with_config(config)
        .process_source("f();")
        .expect_err("script should not converge");
    assert_snapshot!(err.to_string(), @"rewrite did not converge after 3 passes");
}

#[test]
fn unresolved_directive_paths_fail_the_file() {
    let snippet = Snippet::new("bad-path", |instance| {
        let rule = Rule::new().with("kind", "call_expression");
        instance.within_node(&rule, |instance| {
            instance.replace(["nope"], "x");
            Ok(())
        })
    });
    let err = rewriter(snippet)
        .process_source("f();")
        .expect_err("path should not resolve");
    assert_snapshot!(err.to_string(), @"nope is not supported for call_expression");
}

#[rstest]
#[case::rejected(true)]
#[case::tolerated(false)]
fn syntax_errors_follow_the_configuration(#[case] reject: bool) {
    let config = RewriterConfig::default().with_reject_syntax_errors(reject);
    let result = rewriter(Snippet::new("noop", |_| Ok(())))
        .with_config(config)
        .process_source("f(;\n");
    if reject {
        let err = result.expect_err("broken source should be rejected");
        assert!(
            matches!(err, RewriteError::Syntax(SyntaxError::ParseError { .. })),
            "{err}"
        );
    } else {
        assert!(result.is_ok(), "{result:?}");
    }
}

#[test]
fn script_errors_surface_unchanged() {
    let snippet = Snippet::new("refuse", |_| Err(RewriteError::script("refuse", "not today")));
    let err = rewriter(snippet)
        .process_source("f();")
        .expect_err("script fails");
    assert_snapshot!(err.to_string(), @"snippet refuse failed: not today");
}

// =============================================================================
// Files
// =============================================================================

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"))
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap_or_else(|err| panic!("write {name}: {err}"));
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read: {err}"))
}

#[rstest]
fn process_file_writes_changed_files(workspace: TempDir) {
    let path = write(&workspace, "calls.ts", "f(1);\n");
    let result = Rewriter::new(rename_calls())
        .process_file(&path)
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert!(result.affected);
    assert_eq!(result.file_path.as_ref(), Some(&path));
    assert_eq!(read(&path), "renamed(1);\n");
}

#[rstest]
fn test_file_leaves_the_disk_alone(workspace: TempDir) {
    let path = write(&workspace, "calls.ts", "f(1);\n");
    let result = Rewriter::new(rename_calls())
        .test_file(&path)
        .unwrap_or_else(|err| panic!("test: {err}"));
    assert!(result.affected);
    assert_eq!(result.actions.len(), 1);
    assert_eq!(read(&path), "f(1);\n");
}

#[rstest]
fn language_follows_the_file_extension(workspace: TempDir) {
    let snippet = Snippet::new("rename-fns", |instance| {
        let rule = Rule::new().with("kind", "function_item");
        instance.within_node(&rule, |instance| {
            instance.replace(["name"], "renamed");
            Ok(())
        })
    });
    let path = write(&workspace, "lib.rs", "fn old() {}\n");
    Rewriter::new(snippet)
        .process_file(&path)
        .unwrap_or_else(|err| panic!("process: {err}"));
    assert_eq!(read(&path), "fn renamed() {}\n");
}

#[rstest]
fn batches_keep_input_order_and_isolate_failures(workspace: TempDir) {
    let first = write(&workspace, "a.ts", "a(1);\n");
    let broken = write(&workspace, "b.ts", "b(;\n");
    let unknown = write(&workspace, "c.txt", "c(1);\n");
    let missing = workspace.path().join("d.ts");
    let last = write(&workspace, "e.tsx", "e(1);\n");
    let paths = vec![first.clone(), broken, unknown, missing, last.clone()];

    let results = Rewriter::new(rename_calls()).process_files(&paths);
    let summary: Vec<_> = results
        .iter()
        .map(|result| match result {
            Ok(processed) => format!("ok affected={}", processed.affected),
            Err(RewriteError::Syntax(SyntaxError::ParseError { .. })) => "parse error".to_owned(),
            Err(RewriteError::Syntax(SyntaxError::UnknownLanguage { .. })) => {
                "unknown language".to_owned()
            }
            Err(RewriteError::Io { operation, .. }) => format!("io {operation}"),
            Err(other) => format!("other: {other}"),
        })
        .collect();
    assert_snapshot!(summary.join("\n"), @r"
    ok affected=true
    parse error
    unknown language
    io read
    ok affected=true
    ");
    assert_eq!(read(&first), "renamed(1);\n");
    assert_eq!(read(&last), "renamed(1);\n");
}

#[rstest]
fn batch_dry_runs_report_every_file(workspace: TempDir) {
    let paths = vec![
        write(&workspace, "a.ts", "a(1);\n"),
        write(&workspace, "b.ts", "const x = 1;\n"),
    ];
    let results = Rewriter::new(rename_calls()).test_files(&paths);
    let affected: Vec<_> = results
        .into_iter()
        .map(|result| result.map(|tested| tested.affected).ok())
        .collect();
    assert_eq!(affected, vec![Some(true), Some(false)]);
}

#[test]
fn results_serialise_for_reporting() {
    let result = rewriter(rename_calls())
        .test_source("f(1);")
        .unwrap_or_else(|err| panic!("test: {err}"));
    let value = serde_json::to_value(&result).unwrap_or_else(|err| panic!("json: {err}"));
    assert_eq!(
        value,
        json!({
            "file_path": null,
            "affected": true,
            "conflicted": false,
            "actions": [{"start": 0, "end": 1, "new_code": "renamed"}],
        })
    );
}
