#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use testrun::config::{DirSource, RawConfigFile, RunSettings};
use testrun::exec::{CommandSpec, ProcessResult};
use testrun::types::ExitCodePolicy;

/// `sh -c <script>` in `cwd`, with a short timeout and grace suited to tests.
pub fn sh(script: &str, cwd: impl AsRef<Path>) -> CommandSpec {
    CommandSpec::new("sh", cwd.as_ref())
        .with_args(["-c", script])
        .with_timeout(Duration::from_secs(5))
        .with_kill_grace(Duration::from_millis(500))
}

/// Builder for `RawConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn command(mut self, argv: &[&str]) -> Self {
        self.config.runner.command = Some(argv.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn cwd(mut self, dir: &str) -> Self {
        self.config.runner.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, s: &str) -> Self {
        self.config.runner.timeout = Some(s.to_string());
        self
    }

    pub fn kill_grace(mut self, s: &str) -> Self {
        self.config.runner.kill_grace = Some(s.to_string());
        self
    }

    pub fn markers(mut self, markers: &[&str]) -> Self {
        self.config.runner.project_markers =
            Some(markers.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.config.runner.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> RawConfigFile {
        self.config
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProcessResult`.
pub struct ProcessResultBuilder {
    result: ProcessResult,
}

impl ProcessResultBuilder {
    pub fn new() -> Self {
        Self {
            result: ProcessResult {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
                duration: Duration::from_millis(1),
            },
        }
    }

    pub fn stdout(mut self, s: &str) -> Self {
        self.result.stdout = s.to_string();
        self
    }

    pub fn stderr(mut self, s: &str) -> Self {
        self.result.stderr = s.to_string();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.result.exit_code = code;
        self
    }

    pub fn build(self) -> ProcessResult {
        self.result
    }
}

impl Default for ProcessResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings wrapping `spec` as if it came from `--dir`.
pub fn settings(spec: CommandSpec, exit_code: ExitCodePolicy) -> RunSettings {
    RunSettings {
        spec,
        exit_code,
        dir_source: DirSource::Flag,
        config_path: None,
    }
}
