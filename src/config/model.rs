// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ExitCodePolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// command = ["npm", "run", "test:ci"]
/// cwd = "../frontend"
/// timeout = "120s"
/// kill_grace = "5s"
/// exit_code = "propagate"
///
/// [runner.env]
/// CI = "true"
/// ```
///
/// Every key is optional; anything missing falls back to CLI flags,
/// environment variables or built-in defaults at resolution time.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[runner]` section, exactly as written in the file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Argument vector; the first element is the program.
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Working directory, relative to the config file's directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Duration string, e.g. `"120s"` or `"2m"`.
    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub kill_grace: Option<String>,

    #[serde(default)]
    pub shell: Option<bool>,

    #[serde(default)]
    pub exit_code: Option<ExitCodePolicy>,

    /// File names that mark a project root during discovery.
    #[serde(default)]
    pub project_markers: Option<Vec<String>>,

    /// Extra environment variables for the child.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Validated configuration.
///
/// Constructed via `TryFrom<RawConfigFile>` (see `validate.rs`), so durations
/// are parsed and the command, if present, is non-empty.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub command: Option<Vec<String>>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub kill_grace: Option<Duration>,
    pub shell: Option<bool>,
    pub exit_code: Option<ExitCodePolicy>,
    pub project_markers: Option<Vec<String>>,
    pub env: BTreeMap<String, String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerConfig) -> Self {
        Self { runner }
    }
}
