// src/config/resolve.rs

//! Merge CLI flags, environment variables, the config file and defaults into
//! the concrete settings for one run.
//!
//! Precedence, highest first: CLI flag, environment variable, config file,
//! discovery/default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::discover::{default_markers, discover_project_root};
use crate::config::loader::{load_and_validate_with, locate_config};
use crate::config::model::ConfigFile;
use crate::config::validate::{ensure_positive, validate_command};
use crate::errors::{Result, TestrunError};
use crate::exec::CommandSpec;
use crate::fs::FileSystem;
use crate::types::{ExitCodePolicy, duration_ms, parse_duration};

pub const ENV_DIR: &str = "TESTRUN_DIR";
pub const ENV_TIMEOUT: &str = "TESTRUN_TIMEOUT";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

pub fn default_command() -> Vec<String> {
    ["npm", "run", "test:ci"].iter().map(|s| s.to_string()).collect()
}

/// Where the working directory came from; shown in dry-run output and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSource {
    Flag,
    Env,
    Config,
    Discovered,
    CurrentDir,
}

impl fmt::Display for DirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DirSource::Flag => "--dir",
            DirSource::Env => ENV_DIR,
            DirSource::Config => "config file",
            DirSource::Discovered => "discovered project root",
            DirSource::CurrentDir => "current directory",
        };
        f.write_str(s)
    }
}

/// Everything needed to perform one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub spec: CommandSpec,
    pub exit_code: ExitCodePolicy,
    pub dir_source: DirSource,
    pub config_path: Option<PathBuf>,
}

/// The process surroundings resolution depends on.
pub struct ResolveContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub cwd: PathBuf,
    pub env: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl<'a> ResolveContext<'a> {
    /// Context backed by the real process environment.
    pub fn from_process(fs: &'a dyn FileSystem) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self {
            fs,
            cwd,
            env: Box::new(|key: &str| std::env::var(key).ok()),
        })
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|v| !v.trim().is_empty())
    }
}

pub fn resolve_settings(args: &CliArgs, ctx: &ResolveContext<'_>) -> Result<RunSettings> {
    let config_path = locate_config(ctx.fs, &ctx.cwd, args.config.as_deref())?;
    let cfg = match &config_path {
        Some(path) => {
            info!(path = ?path, "loading config");
            load_and_validate_with(ctx.fs, path)?
        }
        None => ConfigFile::default(),
    };
    let runner = &cfg.runner;

    let command = if !args.command.is_empty() {
        validate_command(&args.command, "command after `--`")?;
        args.command.clone()
    } else {
        runner.command.clone().unwrap_or_else(default_command)
    };

    let config_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.cwd.clone());
    let (cwd, dir_source) = resolve_dir(args, ctx, &cfg, &config_dir);

    let timeout = match args.timeout {
        Some(t) => ensure_positive(t, "--timeout")?,
        None => match ctx.var(ENV_TIMEOUT) {
            Some(raw) => {
                let t = parse_duration(&raw)
                    .map_err(|e| TestrunError::ConfigError(format!("{ENV_TIMEOUT}: {e}")))?;
                ensure_positive(t, ENV_TIMEOUT)?
            }
            None => runner.timeout.unwrap_or(DEFAULT_TIMEOUT),
        },
    };

    let kill_grace = args
        .kill_grace
        .or(runner.kill_grace)
        .unwrap_or(DEFAULT_KILL_GRACE);

    let shell = args.shell || runner.shell.unwrap_or(cfg!(windows));
    let exit_code = args.exit_code.or(runner.exit_code).unwrap_or_default();

    let mut spec = CommandSpec::from_argv(&command, cwd)
        .with_timeout(timeout)
        .with_kill_grace(kill_grace)
        .with_shell(shell);
    for (key, value) in &runner.env {
        spec = spec.with_env(key, value);
    }

    debug!(
        cmd = %spec.display(),
        cwd = ?spec.cwd,
        dir_source = %dir_source,
        timeout_ms = duration_ms(timeout),
        "resolved run settings"
    );

    Ok(RunSettings {
        spec,
        exit_code,
        dir_source,
        config_path,
    })
}

fn resolve_dir(
    args: &CliArgs,
    ctx: &ResolveContext<'_>,
    cfg: &ConfigFile,
    config_dir: &Path,
) -> (PathBuf, DirSource) {
    if let Some(dir) = &args.dir {
        return (ctx.cwd.join(dir), DirSource::Flag);
    }
    if let Some(dir) = ctx.var(ENV_DIR) {
        return (ctx.cwd.join(dir), DirSource::Env);
    }
    if let Some(dir) = &cfg.runner.cwd {
        return (config_dir.join(dir), DirSource::Config);
    }

    let markers = cfg
        .runner
        .project_markers
        .clone()
        .unwrap_or_else(default_markers);
    match discover_project_root(ctx.fs, &ctx.cwd, &markers) {
        Some(root) => (root, DirSource::Discovered),
        None => (ctx.cwd.clone(), DirSource::CurrentDir),
    }
}
