// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure path maps to an [`ErrorKind`] and a deterministic process
//! exit code, so `main` can print a labelled diagnostic and exit cleanly.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Output captured from a child before it was terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Error, Debug)]
pub enum TestrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error")]
    TomlError(#[from] toml::de::Error),

    #[error("working directory {0:?} does not exist or is not a directory")]
    MissingWorkingDir(PathBuf),

    #[error("failed to launch `{command}` in {cwd:?}")]
    Launch {
        command: String,
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` did not finish within {timeout:?}; process tree was terminated")]
    Timeout {
        command: String,
        timeout: Duration,
        partial: Box<PartialOutput>,
    },

    #[error("`{command}` was interrupted; process tree was terminated")]
    Interrupted {
        command: String,
        partial: Box<PartialOutput>,
    },

    #[error("failed waiting for `{command}`")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used for diagnostics and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Launch,
    Timeout,
    Interrupted,
    Runtime,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Launch => 127,
            ErrorKind::Timeout => 124,
            ErrorKind::Interrupted => 130,
            ErrorKind::Runtime => 1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Config => "config",
            ErrorKind::Launch => "launch",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Interrupted => "interrupted",
            ErrorKind::Runtime => "runtime",
        };
        f.write_str(s)
    }
}

impl TestrunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TestrunError::ConfigError(_) | TestrunError::TomlError(_) => ErrorKind::Config,
            TestrunError::MissingWorkingDir(_) | TestrunError::Launch { .. } => ErrorKind::Launch,
            TestrunError::Timeout { .. } => ErrorKind::Timeout,
            TestrunError::Interrupted { .. } => ErrorKind::Interrupted,
            TestrunError::Wait { .. } | TestrunError::IoError(_) | TestrunError::Other(_) => {
                ErrorKind::Runtime
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    /// Output captured before a timeout or interruption, if any.
    pub fn partial_output(&self) -> Option<&PartialOutput> {
        match self {
            TestrunError::Timeout { partial, .. } | TestrunError::Interrupted { partial, .. } => {
                Some(&**partial)
            }
            _ => None,
        }
    }

    /// The labelled line printed at the error boundary, followed by one
    /// `caused by:` line per underlying source.
    pub fn diagnostic(&self) -> String {
        let mut out = format!("testrun error [{}]: {self}", self.kind());
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, TestrunError>;
