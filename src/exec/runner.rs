// src/exec/runner.rs

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{PartialOutput, Result, TestrunError};
use crate::exec::capture::StreamCapture;
use crate::exec::command::CommandSpec;
use crate::exec::result::ProcessResult;
use crate::exec::terminate::{kill_leftovers, terminate};
use crate::types::duration_ms;

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Run `spec` to completion and capture its output.
///
/// - Fails with `MissingWorkingDir` / `Launch` if the child cannot start.
/// - Fails with `Timeout` if it is still running after `spec.timeout`.
/// - Fails with `Interrupted` if `cancel` fires first.
///
/// In the last two cases the process tree is terminated before returning and
/// the output captured so far is attached to the error. A dropped `cancel`
/// sender is not a cancellation.
pub async fn run_command(spec: &CommandSpec, cancel: oneshot::Receiver<()>) -> Result<ProcessResult> {
    let command_line = spec.display();

    if !spec.cwd.is_dir() {
        return Err(TestrunError::MissingWorkingDir(spec.cwd.clone()));
    }

    let mut cmd = spec.build();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so termination reaches grandchildren too.
    #[cfg(unix)]
    cmd.process_group(0);

    info!(
        cmd = %command_line,
        cwd = ?spec.cwd,
        timeout_ms = duration_ms(spec.timeout),
        "starting process"
    );

    let started = Instant::now();
    // Timeouts beyond what `Instant` can represent never fire.
    let deadline = started
        .checked_add(spec.timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);

    let mut child = cmd.spawn().map_err(|source| TestrunError::Launch {
        command: command_line.clone(),
        cwd: spec.cwd.clone(),
        source,
    })?;
    let pid = child.id();
    debug!(pid, "process spawned");

    let mut stdout = StreamCapture::spawn("stdout", child.stdout.take());
    let mut stderr = StreamCapture::spawn("stderr", child.stderr.take());

    let cancelled = async move {
        if cancel.await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(cancelled);

    let status = tokio::select! {
        status_res = child.wait() => {
            status_res.map_err(|source| TestrunError::Wait {
                command: command_line.clone(),
                source,
            })?
        }

        _ = tokio::time::sleep_until(deadline) => {
            warn!(
                cmd = %command_line,
                pid,
                timeout_ms = duration_ms(spec.timeout),
                "timeout elapsed; terminating process tree"
            );
            terminate(&mut child, pid, spec.kill_grace).await;
            let partial = collect_partial(stdout, stderr, spec).await;
            return Err(TestrunError::Timeout {
                command: command_line,
                timeout: spec.timeout,
                partial: Box::new(partial),
            });
        }

        _ = &mut cancelled => {
            warn!(cmd = %command_line, pid, "interrupted; terminating process tree");
            terminate(&mut child, pid, spec.kill_grace).await;
            let partial = collect_partial(stdout, stderr, spec).await;
            return Err(TestrunError::Interrupted {
                command: command_line,
                partial: Box::new(partial),
            });
        }
    };

    // The child is gone, but descendants may still hold the pipes open.
    let remaining = deadline.saturating_duration_since(Instant::now());
    let (out_done, err_done) = tokio::join!(stdout.wait(remaining), stderr.wait(remaining));
    if !(out_done && err_done) {
        warn!(
            cmd = %command_line,
            pid,
            "output still held open by leftover processes at deadline; killing them"
        );
        kill_leftovers(pid);
        tokio::join!(stdout.wait(spec.kill_grace), stderr.wait(spec.kill_grace));
    }

    let exit_code = exit_code_of(&status);
    let duration = started.elapsed();

    info!(
        cmd = %command_line,
        exit_code,
        success = status.success(),
        elapsed_ms = duration_ms(duration),
        "process exited"
    );

    Ok(ProcessResult {
        stdout: stdout.into_text(),
        stderr: stderr.into_text(),
        exit_code,
        duration,
    })
}

async fn collect_partial(
    mut stdout: StreamCapture,
    mut stderr: StreamCapture,
    spec: &CommandSpec,
) -> PartialOutput {
    tokio::join!(stdout.wait(spec.kill_grace), stderr.wait(spec.kill_grace));
    PartialOutput {
        stdout: stdout.into_text(),
        stderr: stderr.into_text(),
    }
}

fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
