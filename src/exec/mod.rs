// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs one command with `tokio::process::Command`, captures its output and
//! enforces the timeout.
//!
//! - [`command`] defines [`CommandSpec`], the resolved invocation.
//! - [`runner`] spawns, waits and races the timeout / interruption.
//! - [`capture`] drains stdout and stderr concurrently.
//! - [`terminate`] stops the child and its process group.
//! - [`backend`] provides the `ProcessRunner` trait and the production
//!   `TokioProcessRunner`, which tests can replace with a fake.

pub mod backend;
pub mod command;
pub mod result;
pub mod runner;

mod capture;
mod terminate;

pub use backend::{ProcessRunner, TokioProcessRunner};
pub use command::CommandSpec;
pub use result::ProcessResult;
pub use runner::run_command;
