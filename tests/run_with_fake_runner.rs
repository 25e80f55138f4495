// tests/run_with_fake_runner.rs

mod common;
use crate::common::builders::{ProcessResultBuilder, settings};
use crate::common::{TestResult, init_tracing};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use testrun::errors::{ErrorKind, PartialOutput, TestrunError};
use testrun::exec::CommandSpec;
use testrun::run_with;
use testrun::types::ExitCodePolicy;
use testrun_test_utils::fake_runner::FakeRunner;

fn spec() -> CommandSpec {
    CommandSpec::new("npm", "/work/front").with_args(["run", "test:ci"])
}

#[tokio::test]
async fn report_policy_prints_sections_and_exits_zero() -> TestResult {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut runner = FakeRunner::new(Arc::clone(&calls)).with_outcome(Ok(
        ProcessResultBuilder::new()
            .stdout("A\n")
            .stderr("B\n")
            .exit_code(3)
            .build(),
    ));
    let (_tx, rx) = oneshot::channel();
    let mut out = Vec::new();

    let status = run_with(&settings(spec(), ExitCodePolicy::Report), &mut runner, rx, &mut out).await?;

    assert_eq!(status, 0);
    assert_eq!(
        String::from_utf8(out)?,
        "STDOUT:\nA\n\n\nSTDERR:\nB\n\n\nReturn code: 3\n"
    );

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "npm");
    assert_eq!(calls[0].cwd, PathBuf::from("/work/front"));
    Ok(())
}

#[tokio::test]
async fn propagate_policy_returns_child_code() -> TestResult {
    init_tracing();
    let cases = [(0, 0), (7, 7), (255, 255), (-9, 137), (-15, 143), (300, 1)];

    for (child_code, expected) in cases {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut runner = FakeRunner::new(calls)
            .with_outcome(Ok(ProcessResultBuilder::new().exit_code(child_code).build()));
        let (_tx, rx) = oneshot::channel();
        let mut out = Vec::new();

        let status = run_with(
            &settings(spec(), ExitCodePolicy::Propagate),
            &mut runner,
            rx,
            &mut out,
        )
        .await?;

        assert_eq!(status, expected, "child exit code {child_code}");
        let text = String::from_utf8(out)?;
        assert!(text.ends_with(&format!("Return code: {child_code}\n")));
    }
    Ok(())
}

#[tokio::test]
async fn timeout_prints_partial_output_then_fails() -> TestResult {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut runner = FakeRunner::new(calls).with_outcome(Err(TestrunError::Timeout {
        command: "npm run test:ci".to_string(),
        timeout: Duration::from_secs(120),
        partial: Box::new(PartialOutput {
            stdout: "RUN  v1.6.0\n".to_string(),
            stderr: String::new(),
        }),
    }));
    let (_tx, rx) = oneshot::channel();
    let mut out = Vec::new();

    let err = run_with(&settings(spec(), ExitCodePolicy::Report), &mut runner, rx, &mut out)
        .await
        .expect_err("timeout should surface as an error");

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.exit_code(), 124);
    assert!(err.to_string().contains("did not finish within 120s"));

    let text = String::from_utf8(out)?;
    assert!(text.starts_with("STDOUT (partial):\nRUN  v1.6.0\n"));
    assert!(text.contains("STDERR (partial):"));
    assert!(!text.contains("Return code"));
    Ok(())
}

#[tokio::test]
async fn launch_failure_prints_nothing_and_is_not_a_timeout() -> TestResult {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut runner = FakeRunner::new(calls).with_outcome(Err(TestrunError::Launch {
        command: "npm run test:ci".to_string(),
        cwd: PathBuf::from("/work/front"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
    }));
    let (_tx, rx) = oneshot::channel();
    let mut out = Vec::new();

    let err = run_with(&settings(spec(), ExitCodePolicy::Propagate), &mut runner, rx, &mut out)
        .await
        .expect_err("launch failure");

    assert_eq!(err.kind(), ErrorKind::Launch);
    assert_ne!(err.exit_code(), 0);
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn sequential_runs_are_independent() -> TestResult {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut runner = FakeRunner::new(Arc::clone(&calls))
        .with_outcome(Ok(ProcessResultBuilder::new().stdout("first").build()))
        .with_outcome(Ok(ProcessResultBuilder::new().stdout("second").build()));
    let run_settings = settings(spec(), ExitCodePolicy::Report);

    let mut first = Vec::new();
    let (_tx1, rx1) = oneshot::channel();
    run_with(&run_settings, &mut runner, rx1, &mut first).await?;

    let mut second = Vec::new();
    let (_tx2, rx2) = oneshot::channel();
    run_with(&run_settings, &mut runner, rx2, &mut second).await?;

    assert!(String::from_utf8(first)?.contains("first"));
    let second = String::from_utf8(second)?;
    assert!(second.contains("second"));
    assert!(!second.contains("first"));
    assert_eq!(calls.lock().unwrap().len(), 2);
    Ok(())
}
