// src/exec/command.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;

use crate::config::resolve::{DEFAULT_KILL_GRACE, DEFAULT_TIMEOUT};

/// A fully resolved command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
    /// Time between polite termination and forced kill.
    pub kill_grace: Duration,
    /// Run the joined argv through `sh -c` / `cmd /C`.
    pub shell: bool,
    /// Merged over the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            timeout: DEFAULT_TIMEOUT,
            kill_grace: DEFAULT_KILL_GRACE,
            shell: false,
            env: BTreeMap::new(),
        }
    }

    /// Build from an argument vector whose first element is the program.
    pub fn from_argv(argv: &[String], cwd: impl Into<PathBuf>) -> Self {
        let (program, args) = match argv.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Self::new(program, cwd).with_args(args)
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn with_shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Human-readable command line for logs and diagnostics.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| {
                if part.is_empty() || part.chars().any(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The line handed to the shell in shell mode (argv joined verbatim).
    fn shell_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the `tokio` command. Stdio and process-group setup are left to
    /// the runner.
    pub(crate) fn build(&self) -> Command {
        let mut cmd = if self.shell {
            if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(self.shell_line());
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(self.shell_line());
                c
            }
        } else {
            let mut c = Command::new(&self.program);
            c.args(&self.args);
            c
        };

        cmd.current_dir(&self.cwd).envs(&self.env);
        cmd
    }
}
