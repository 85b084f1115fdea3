// tests/shell_integration.rs
//
// End-to-end runs against a real temporary directory and `sh`.

#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;
use tom::engine::BuildOptions;
use tom::exec::ShellExecutor;
use tom::fs::{FileSystem, RealFileSystem};
use tom::Project;
use tom_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn shell_commands_generate_and_then_skip_products() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path();
    fs::write(root.join("Tomfile"), "[environment]\ngreeting = \"hello\"\n")?;
    fs::create_dir_all(root.join("src"))?;
    fs::write(
        root.join("src/greet.c"),
        "// @produces \"greet.txt\" echo $GREETING from $# > $@\n",
    )?;
    fs::write(
        root.join("main.c"),
        "// @requires \"src/greet.txt\"\n// @produces \"all.txt\" cat $^ > $@\n",
    )?;

    let real: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project = Project::load(Arc::clone(&real), root, None, Vec::new())?;
    let engine = project.engine(Arc::new(ShellExecutor::new()), BuildOptions::default());

    let report = with_timeout(engine.build("all.txt")).await?;
    assert!(report.succeeded(), "failures: {:?}", report.failures);
    assert_eq!(report.built, 2);

    let greet = root.join("src/greet.c");
    let expected = format!("hello from {}\n", greet.display());
    assert_eq!(fs::read_to_string(root.join("all.txt"))?, expected);

    let again = with_timeout(engine.build("all.txt")).await?;
    assert_eq!(again.built, 0);
    assert!(again.up_to_date);
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_as_a_failure() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path();
    fs::write(
        root.join("broken.c"),
        "// @produces \"broken.o\" echo oops >&2; exit 3\n",
    )?;

    let project = Project::load(Arc::new(RealFileSystem), root, None, Vec::new())?;
    let engine = project.engine(Arc::new(ShellExecutor::new()), BuildOptions::default());

    let report = with_timeout(engine.build("broken.o")).await?;
    assert!(!report.succeeded());
    assert_eq!(report.built, 0);
    assert_eq!(report.failures.len(), 1);

    let message = &report.failures[0].message;
    assert!(message.contains("status 3"), "message was: {message}");
    assert!(message.contains("oops"), "message was: {message}");
    assert!(!root.join("broken.o").exists());
    Ok(())
}
