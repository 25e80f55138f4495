// src/exec/backend.rs

//! Pluggable runner abstraction.
//!
//! The top-level wiring talks to a `ProcessRunner` instead of calling
//! [`run_command`] directly, so tests can swap in a fake that returns canned
//! results or errors without spawning anything.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::oneshot;

use crate::errors::Result;
use crate::exec::command::CommandSpec;
use crate::exec::result::ProcessResult;
use crate::exec::runner::run_command;

/// Trait abstracting how a command is executed.
pub trait ProcessRunner: Send {
    /// Run `spec` once. `cancel` fires on user interruption.
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>>;
}

/// Production runner: spawns a real OS process via `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        Box::pin(run_command(spec, cancel))
    }
}
