// tests/templating.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tom::errors::TomError;
use tom::template::{substitute_tokens, Environment, Templater, TokenContext};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn nested_references_expand_to_a_fixed_point() -> TestResult {
    let env = Environment::new().with_var("A", "$B").with_var("B", "x");
    assert_eq!(env.expand("cmd $A")?, "cmd x");
    Ok(())
}

#[test]
fn undefined_references_are_left_untouched() -> TestResult {
    let env = Environment::new().with_var("CC", "gcc");
    assert_eq!(env.expand("$CC $CFLAGS -c")?, "gcc $CFLAGS -c");
    Ok(())
}

#[test]
fn names_match_whole_identifiers_only() -> TestResult {
    let env = Environment::new().with_var("C", "short").with_var("CC", "gcc");
    assert_eq!(env.expand("$CC $C")?, "gcc short");
    Ok(())
}

#[test]
fn cyclic_definitions_fail_instead_of_looping() {
    let env = Environment::new().with_var("A", "$B").with_var("B", "$A");
    let err = env.expand("$A").expect_err("expansion must not settle");
    assert!(matches!(err, TomError::Template(_)));
}

#[test]
fn overrides_replace_base_variables() {
    let env = Environment::capture(
        vec![("CC".to_string(), "cc".to_string()), ("HOME".to_string(), "/h".to_string())],
        vec![("CC".to_string(), "clang".to_string())],
    );
    assert_eq!(env.get("CC"), Some("clang"));
    assert_eq!(env.get("HOME"), Some("/h"));
    assert_eq!(env.len(), 2);
}

#[test]
fn tokens_are_replaced_with_node_paths() {
    let reqs = vec![PathBuf::from("src/util.o"), PathBuf::from("lib/x.o")];
    let ctx = TokenContext {
        source: Path::new("src/foo.c"),
        requirements: &reqs,
        output: Path::new("src/foo.o"),
    };

    assert_eq!(
        substitute_tokens("cc -c $# -I$~ -o $@ $^", &ctx),
        "cc -c src/foo.c -Isrc -o src/foo.o src/util.o lib/x.o"
    );
}

#[test]
fn source_directory_of_a_top_level_file_is_dot() {
    let ctx = TokenContext {
        source: Path::new("main.c"),
        requirements: &[],
        output: Path::new("main"),
    };
    assert_eq!(substitute_tokens("cd $~ && ls", &ctx), "cd . && ls");
}

#[test]
fn substituted_text_is_not_scanned_again() {
    let ctx = TokenContext {
        source: Path::new("weird$@.c"),
        requirements: &[],
        output: Path::new("out"),
    };
    assert_eq!(substitute_tokens("$# $$ $x", &ctx), "weird$@.c $$ $x");
}

#[test]
fn templater_expands_environment_before_tokens() -> TestResult {
    let env = Environment::new().with_var("OUT", "-o $@");
    let templater = Templater::new(Arc::new(env));
    let ctx = TokenContext {
        source: Path::new("a.c"),
        requirements: &[],
        output: Path::new("a.o"),
    };
    assert_eq!(templater.render("cc $# $OUT", &ctx)?, "cc a.c -o a.o");
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_utf8_process_variables_are_left_out_of_the_snapshot() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    use tom::template::utf8_vars;

    let listing = vec![
        (OsString::from("CC"), OsString::from("gcc")),
        (OsString::from("LATIN1"), OsString::from_vec(b"caf\xe9".to_vec())),
        (OsString::from_vec(b"BAD\xff".to_vec()), OsString::from("x")),
    ];

    let env = Environment::capture(utf8_vars(listing), Vec::new());
    assert_eq!(env.get("CC"), Some("gcc"));
    assert_eq!(env.get("LATIN1"), None);
    assert_eq!(env.len(), 1);
}
