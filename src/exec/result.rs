// src/exec/result.rs

use std::time::Duration;

/// Everything captured from one finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `-N` when the child was killed by signal `N`.
    pub exit_code: i32,
    pub duration: Duration,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
