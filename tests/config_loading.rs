// tests/config_loading.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use tom::config::{find_tomfile, load_and_validate, load_for_root, DEFAULT_INCLUDE};
use tom::config::model::{EnvValue, RawTomfile};
use tom::config::Tomfile;
use tom::errors::TomError;
use tom::fs::mock::MockFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_tomfile_yields_defaults() -> TestResult {
    let fs = MockFileSystem::new();
    let cfg = load_for_root(&fs, Path::new("."), None)?;

    assert!(cfg.environment().is_empty());
    assert_eq!(cfg.build().jobs, 1);
    assert_eq!(cfg.build().max_tasks, 64);
    assert!(cfg.build().share_results);
    assert_eq!(cfg.scan().include, DEFAULT_INCLUDE);
    assert!(cfg.scan().exclude.is_empty());
    Ok(())
}

#[test]
fn os_specific_tomfile_wins_over_generic() {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "");
    fs.add_file("Tomfile.linux", "");

    assert_eq!(
        find_tomfile(&fs, Path::new("."), "linux"),
        Some(PathBuf::from("./Tomfile.linux"))
    );
    assert_eq!(
        find_tomfile(&fs, Path::new("."), "darwin"),
        Some(PathBuf::from("./Tomfile"))
    );
}

#[test]
fn no_tomfile_is_found_in_an_empty_root() {
    let fs = MockFileSystem::new();
    assert_eq!(find_tomfile(&fs, Path::new("."), "linux"), None);
}

#[test]
fn environment_keys_are_uppercased_and_scalars_stringified() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "Tomfile",
        r#"
[environment]
cc = "clang"
opt_level = 2
debug = true

[build]
jobs = 4
share_results = false
"#,
    );

    let cfg = load_and_validate(&fs, "Tomfile")?;
    let env = cfg.environment();
    assert_eq!(env.get("CC").map(String::as_str), Some("clang"));
    assert_eq!(env.get("OPT_LEVEL").map(String::as_str), Some("2"));
    assert_eq!(env.get("DEBUG").map(String::as_str), Some("true"));
    assert!(!env.contains_key("cc"));

    assert_eq!(cfg.build().jobs, 4);
    assert_eq!(cfg.build().max_tasks, 64);
    assert!(!cfg.build().share_results);
    Ok(())
}

#[test]
fn explicit_tomfile_path_is_used_as_is() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "[build]\njobs = 2\n");
    fs.add_file("conf/ci.toml", "[build]\njobs = 8\n");

    let cfg = load_for_root(&fs, Path::new("."), Some(Path::new("conf/ci.toml")))?;
    assert_eq!(cfg.build().jobs, 8);
    Ok(())
}

#[test]
fn zero_jobs_is_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "[build]\njobs = 0\n");

    let err = load_and_validate(&fs, "Tomfile").expect_err("jobs = 0 must fail");
    assert!(matches!(err, TomError::Config(msg) if msg.contains("jobs")));
}

#[test]
fn empty_include_list_is_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "[scan]\ninclude = []\n");

    let err = load_and_validate(&fs, "Tomfile").expect_err("empty include must fail");
    assert!(matches!(err, TomError::Config(_)));
}

#[test]
fn invalid_glob_is_rejected() {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "[scan]\nexclude = [\"a[\"]\n");

    let err = load_and_validate(&fs, "Tomfile").expect_err("bad glob must fail");
    assert!(matches!(err, TomError::Config(msg) if msg.contains("a[")));
}

#[test]
fn invalid_environment_name_is_rejected() {
    let mut raw = RawTomfile::default();
    raw.environment
        .insert("1BAD".to_string(), EnvValue::Str("x".to_string()));

    let err = Tomfile::try_from(raw).expect_err("digit-leading name must fail");
    assert!(matches!(err, TomError::Config(_)));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let fs = MockFileSystem::new();
    fs.add_file("Tomfile", "[build\njobs = 1\n");

    let err = load_and_validate(&fs, "Tomfile").expect_err("broken TOML must fail");
    assert!(matches!(err, TomError::Toml(_)));
}
