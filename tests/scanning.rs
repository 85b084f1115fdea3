// tests/scanning.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tom::errors::TomError;
use tom::scan::{parse_directives, scan_text, Directive};
use tom::template::{Environment, Templater};
use tom::Project;
use tom_test_utils::builders::SourceTreeBuilder;
use tom_test_utils::faulty_fs::FaultyFileSystem;
use tom_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn templater(vars: &[(&str, &str)]) -> Templater {
    let env = vars
        .iter()
        .fold(Environment::new(), |env, (k, v)| env.with_var(*k, *v));
    Templater::new(Arc::new(env))
}

#[test]
fn directives_are_found_anywhere_on_a_line() {
    let text = r#"
#include <stdio.h>
/* @requires "util.o" "../lib/x.o" */
// @produces "foo.o" cc -c $# -o $@
// @default "foo.o"
"#;

    let directives = parse_directives(text);
    assert_eq!(
        directives,
        vec![
            Directive::Requires(vec!["util.o".into(), "../lib/x.o".into()]),
            Directive::Produces {
                name: "foo.o".into(),
                command: "cc -c $# -o $@".into(),
            },
            Directive::Default(vec!["foo.o".into()]),
        ]
    );
}

#[test]
fn produces_without_quoted_name_is_skipped() {
    let text = "// @produces foo.o cc -c $#\n// @produces \"bar.o\" true\n";
    let directives = parse_directives(text);
    assert_eq!(
        directives,
        vec![Directive::Produces {
            name: "bar.o".into(),
            command: "true".into(),
        }]
    );
}

#[test]
fn unknown_keywords_are_ignored() {
    let text = "// @author someone\n// contact: dev@example.org\n// @requires \"a.o\"\n";
    assert_eq!(
        parse_directives(text),
        vec![Directive::Requires(vec!["a.o".into()])]
    );
}

#[test]
fn literals_resolve_against_the_declaring_directory() -> TestResult {
    init_tracing();

    let text = r#"
// @requires "util.o" "../lib/x.o"
// @produces "foo.o" cc -c $# -o $@
"#;
    let scanned = scan_text(Path::new("src/foo.c"), text, &templater(&[]))?;
    let node = scanned.node;

    assert_eq!(node.name(), Path::new("src/foo.c"));
    assert_eq!(
        node.requirements(),
        &[PathBuf::from("src/util.o"), PathBuf::from("lib/x.o")]
    );
    assert_eq!(node.products().len(), 1);
    assert_eq!(node.products()[0].name(), "foo.o");
    assert_eq!(node.products()[0].path(), Path::new("src/foo.o"));
    Ok(())
}

#[test]
fn commands_see_every_requirement_of_the_file() -> TestResult {
    // The second @requires comes after @produces but still feeds $^.
    let text = r#"
// @requires "a.o"
// @produces "app" $CC -o $@ $^
// @requires "b.o"
"#;
    let scanned = scan_text(Path::new("app.c"), text, &templater(&[("CC", "gcc")]))?;
    assert_eq!(scanned.node.products()[0].command(), "gcc -o app a.o b.o");
    Ok(())
}

#[test]
fn defaults_are_kept_raw_and_in_order() -> TestResult {
    let text = "// @default \"app\" \"tests/run\"\n// @default \"docs\"\n";
    let scanned = scan_text(Path::new("sub/main.c"), text, &templater(&[]))?;
    assert_eq!(scanned.defaults, vec!["app", "tests/run", "docs"]);
    assert!(scanned.node.products().is_empty());
    Ok(())
}

#[test]
fn unstable_environment_fails_the_scan_of_that_file() {
    let text = "// @produces \"loop\" $A\n";
    let err = scan_text(Path::new("loop.c"), text, &templater(&[("A", "$B"), ("B", "$A")]))
        .expect_err("cyclic variables must not settle");

    match err {
        TomError::Scan { path, message } => {
            assert_eq!(path, PathBuf::from("loop.c"));
            assert!(message.contains("loop"), "message was: {message}");
        }
        other => panic!("expected a scan error, got {other:?}"),
    }
}

#[test]
fn project_registers_products_and_defaults_from_every_source() -> TestResult {
    init_tracing();

    let project = SourceTreeBuilder::new()
        .source("main.c", &[r#"// @default "app""#, r#"// @produces "app" cc -o $@ $^"#, r#"// @requires "util/u.o""#])
        .source("util/u.c", &[r#"// @produces "u.o" cc -c $# -o $@"#])
        .file("README.md", r#"@produces "ignored" true"#)
        .load()?;

    let registry = project.registry();
    assert_eq!(registry.product_count(), 2);
    assert!(registry.is_product(Path::new("app")));
    assert!(registry.is_product(Path::new("util/u.o")));
    assert!(!registry.is_product(Path::new("ignored")));
    assert_eq!(registry.defaults(), &["app".to_string()]);

    let u = registry
        .lookup(Path::new("util/u.o"))
        .ok_or("util/u.o not registered")?;
    assert_eq!(u.products()[0].command(), "cc -c util/u.c -o util/u.o");
    Ok(())
}

#[test]
fn last_registered_declaration_of_a_product_wins() -> TestResult {
    // Sources are scanned in sorted order: a.c before b.c.
    let project = SourceTreeBuilder::new()
        .source("a.c", &[r#"// @produces "out" echo from-a"#])
        .source("b.c", &[r#"// @produces "out" echo from-b"#])
        .load()?;

    let owner = project
        .registry()
        .lookup(Path::new("out"))
        .ok_or("out not registered")?;
    assert_eq!(owner.name(), Path::new("b.c"));
    assert_eq!(project.registry().all_products().len(), 1);
    Ok(())
}

#[test]
fn exclude_globs_from_the_tomfile_skip_sources() -> TestResult {
    let project = SourceTreeBuilder::new()
        .file(
            "Tomfile",
            "[scan]\ninclude = [\"**/*.c\"]\nexclude = [\"vendor/**\"]\n",
        )
        .source("a.c", &[r#"// @produces "a.o" true"#])
        .source("vendor/v.c", &[r#"// @produces "v.o" true"#])
        .load()?;

    assert!(project.registry().is_product(Path::new("a.o")));
    assert!(!project.registry().is_product(Path::new("vendor/v.o")));
    Ok(())
}

#[test]
fn sources_that_are_not_utf8_are_still_scanned() -> TestResult {
    init_tracing();

    let project = SourceTreeBuilder::new()
        .source("a.c", &[r#"// @produces "a.o" true"#])
        .bytes("legacy.h", b"/* caf\xe9 */\n// @produces \"legacy.pch\" true\n")
        .load()?;

    assert!(project.registry().is_product(Path::new("a.o")));
    assert!(project.registry().is_product(Path::new("legacy.pch")));
    Ok(())
}

#[test]
fn unreadable_source_aborts_loading() {
    init_tracing();

    let tree = SourceTreeBuilder::new()
        .source("a.c", &[r#"// @produces "a.o" true"#])
        .source("x.c", &[r#"// @produces "x.o" true"#]);
    let fs = FaultyFileSystem::new(tree.fs()).unreadable("x.c");

    let err = Project::load(Arc::new(fs), Path::new("."), None, Vec::new())
        .expect_err("an unreadable source must fail the whole load");

    match err {
        TomError::Scan { path, message } => {
            assert_eq!(path, PathBuf::from("x.c"));
            assert!(message.contains("Permission denied"), "message was: {message}");
        }
        other => panic!("expected a scan error, got {other:?}"),
    }
}
