//! Test: diff handling, no-op runs and the upload call

use crate::helpers::*;
use monorepo_diff::{CommandOutput, DiffError, Driver, DriverOptions, Outcome};

const DIFF: &str = "git diff --name-only HEAD~1";

/// Empty diff output is a no-op: no resolution, no upload
#[tokio::test]
async fn test_empty_diff_is_noop() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .respond(DIFF, CommandOutput::success("  \n"))
        .with_agent();

    let (result, driver) = run_driver(&config, runner).await;
    assert_eq!(result.unwrap(), Outcome::NoChanges);

    let calls = driver.runner().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].key(), DIFF);
}

/// Changed files that resolve to nothing skip the upload
#[tokio::test]
async fn test_no_steps_is_noop() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .with_diff(DIFF, &["docs/readme.md"])
        .with_agent();
    let dir = tempfile::tempdir().unwrap();

    let driver = Driver::new(
        runner,
        DriverOptions {
            artifact_dir: Some(dir.path().to_path_buf()),
            ..test_options()
        },
    );
    assert_eq!(driver.run(&config).await.unwrap(), Outcome::NoSteps);
    assert!(driver.runner().upload_calls().is_empty());
    assert!(leftover_artifacts(dir.path()).is_empty(), "pipeline file should be removed");
}

/// Hooks alone are enough to upload
#[tokio::test]
async fn test_hooks_without_matches_still_upload() {
    let config = load_config(
        r#"{"hooks": ["echo always"], "watch": [{"path": "app/", "config": {"command": "x"}}]}"#,
    );
    let runner = MockRunner::new()
        .with_diff(DIFF, &["docs/readme.md"])
        .with_agent();

    let (result, driver) = run_driver(&config, runner).await;
    assert!(matches!(result.unwrap(), Outcome::Uploaded { .. }));
    assert_eq!(driver.runner().uploads()[0], "steps:\n- command: echo always\n");
}

/// Upload is `pipeline upload <file>`, and the file is gone afterwards
#[tokio::test]
async fn test_upload_arguments_and_cleanup() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .with_diff(DIFF, &["app/main.rs"])
        .with_agent();

    let (result, driver) = run_driver(&config, runner).await;
    let (command, args) = match result.unwrap() {
        Outcome::Uploaded { command, args } => (command, args),
        other => panic!("Expected upload, got {:?}", other),
    };

    assert_eq!(command, AGENT);
    assert_eq!(args.len(), 3);
    assert_eq!(&args[..2], &["pipeline".to_string(), "upload".to_string()]);
    assert!(!std::path::Path::new(&args[2]).exists(), "pipeline file should be removed");

    let uploads = driver.runner().upload_calls();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].args, args);
}

/// Disabling interpolation adds the flag
#[tokio::test]
async fn test_no_interpolation_flag() {
    let config = load_config(
        r#"{"interpolation": false, "watch": [{"path": "app/", "config": {"command": "x"}}]}"#,
    );
    let runner = MockRunner::new()
        .with_diff(DIFF, &["app/main.rs"])
        .with_agent();

    let (result, _driver) = run_driver(&config, runner).await;
    match result.unwrap() {
        Outcome::Uploaded { args, .. } => {
            assert_eq!(args.last().map(String::as_str), Some("--no-interpolation"));
        }
        other => panic!("Expected upload, got {:?}", other),
    }
}

/// A failing diff aborts with its stderr
#[tokio::test]
async fn test_diff_failure_propagates() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .respond(DIFF, CommandOutput::failure(128, "fatal: bad revision 'HEAD~1'"))
        .with_agent();

    let (result, driver) = run_driver(&config, runner).await;
    match result {
        Err(DiffError::ExternalCommand { code, output, .. }) => {
            assert_eq!(code, 128);
            assert!(output.contains("bad revision"));
        }
        other => panic!("Expected ExternalCommand, got {:?}", other),
    }
    assert!(driver.runner().upload_calls().is_empty());
}

/// A rejected upload is an error, and the file is still cleaned up
#[tokio::test]
async fn test_upload_failure_propagates() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .with_diff(DIFF, &["app/main.rs"])
        .respond(AGENT, CommandOutput::failure(1, "invalid pipeline"));

    let (result, driver) = run_driver(&config, runner).await;
    assert!(matches!(result, Err(DiffError::ExternalCommand { code: 1, .. })));

    let uploads = driver.runner().upload_calls();
    assert_eq!(uploads.len(), 1);
    assert!(!std::path::Path::new(&uploads[0].args[2]).exists());
}

/// Newlines in a multi-line diff command are flattened before running
#[tokio::test]
async fn test_multiline_diff_command() {
    let config = load_config(
        r#"{"diff": "git diff\n--name-only\nmain", "watch": [{"path": "app/", "config": {"command": "x"}}]}"#,
    );
    let runner = MockRunner::new()
        .with_diff("git diff --name-only main", &["app/main.rs"])
        .with_agent();

    let (result, _driver) = run_driver(&config, runner).await;
    assert!(matches!(result.unwrap(), Outcome::Uploaded { .. }));
}

/// Dry run builds the pipeline but never calls the agent
#[tokio::test]
async fn test_dry_run_skips_upload() {
    let config = load_config(r#"{"watch": [{"path": "app/", "config": {"command": "x"}}]}"#);
    let runner = MockRunner::new()
        .with_diff(DIFF, &["app/main.rs"])
        .with_agent();
    let dir = tempfile::tempdir().unwrap();

    let driver = Driver::new(
        runner,
        DriverOptions {
            dry_run: true,
            artifact_dir: Some(dir.path().to_path_buf()),
            ..test_options()
        },
    );

    match driver.run(&config).await.unwrap() {
        Outcome::DryRun { pipeline } => assert_eq!(pipeline, "steps:\n- command: x\n"),
        other => panic!("Expected dry run, got {:?}", other),
    }
    assert!(driver.runner().upload_calls().is_empty());
    assert!(leftover_artifacts(dir.path()).is_empty(), "pipeline file should be removed");
}

/// Paths the diff prints on stderr count as changed files too
#[tokio::test]
async fn test_diff_stderr_is_part_of_the_output() {
    let config = load_config(
        r#"{"watch": [
            {"path": "app/", "config": {"command": "build-app"}},
            {"path": "lib/", "config": {"command": "build-lib"}}
        ]}"#,
    );
    let diff_output = CommandOutput {
        code: 0,
        stdout: "app/main.rs\n".to_string(),
        stderr: "lib/util.rs\n".to_string(),
    };
    let runner = MockRunner::new().respond(DIFF, diff_output).with_agent();

    let (result, driver) = run_driver(&config, runner).await;
    assert!(matches!(result.unwrap(), Outcome::Uploaded { .. }));
    assert_eq!(
        driver.runner().uploads()[0],
        "steps:\n- command: build-app\n- command: build-lib\n"
    );
}

/// The configured shell runs the diff
#[tokio::test]
async fn test_diff_runs_through_configured_shell() {
    let config = load_config(r#"{"watch": []}"#);
    let runner = MockRunner::new().with_diff(DIFF, &[]);

    let driver = Driver::new(
        runner,
        DriverOptions {
            shell: "/bin/zsh".to_string(),
            ..test_options()
        },
    );
    assert_eq!(driver.run(&config).await.unwrap(), Outcome::NoChanges);

    let calls = driver.runner().calls();
    assert_eq!(calls[0].program, "/bin/zsh");
    assert_eq!(calls[0].args, vec!["-c".to_string(), DIFF.to_string()]);
}
