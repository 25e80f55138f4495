// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod types;

use std::io::Write;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{ResolveContext, RunSettings, resolve_settings};
use crate::errors::Result;
use crate::exec::{ProcessRunner, TokioProcessRunner};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// Resolves settings, runs the command once, prints the report and returns
/// the exit status the process should end with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let fs = RealFileSystem;
    let ctx = ResolveContext::from_process(&fs)?;
    let settings = resolve_settings(&args, &ctx)?;

    let mut stdout = std::io::stdout();

    if args.dry_run {
        report::write_dry_run(&mut stdout, &settings)?;
        return Ok(0);
    }

    // Ctrl-C → terminate the child and report what we have.
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let ctrl_c = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received");
                let _ = cancel_tx.send(());
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl+C"),
        }
    });

    let mut runner = TokioProcessRunner::new();
    let status = run_with(&settings, &mut runner, cancel_rx, &mut stdout).await;
    ctrl_c.abort();
    status
}

/// Run once with the given runner and write the report to `out`.
///
/// On timeout or interruption the partial output is written before the error
/// is returned.
pub async fn run_with(
    settings: &RunSettings,
    runner: &mut dyn ProcessRunner,
    cancel: oneshot::Receiver<()>,
    out: &mut dyn Write,
) -> Result<i32> {
    match runner.run(&settings.spec, cancel).await {
        Ok(result) => {
            report::write_report(out, &result)?;
            let status = settings.exit_code.exit_status_for(result.exit_code);
            info!(
                exit_code = result.exit_code,
                policy = ?settings.exit_code,
                status,
                "run complete"
            );
            Ok(status)
        }
        Err(err) => {
            if let Some(partial) = err.partial_output() {
                report::write_partial_report(out, partial)?;
            }
            Err(err)
        }
    }
}
