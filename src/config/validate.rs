// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, RunnerConfig, RunnerSection};
use crate::errors::{Result, TestrunError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TestrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let runner = validate_runner(raw.runner)?;
        Ok(ConfigFile::new_unchecked(runner))
    }
}

fn validate_runner(section: RunnerSection) -> Result<RunnerConfig> {
    if let Some(command) = &section.command {
        validate_command(command, "[runner].command")?;
    }

    let timeout = section
        .timeout
        .as_deref()
        .map(|s| parse_positive_duration(s, "[runner].timeout"))
        .transpose()?;
    let kill_grace = section
        .kill_grace
        .as_deref()
        .map(|s| parse_config_duration(s, "[runner].kill_grace"))
        .transpose()?;

    if let Some(markers) = &section.project_markers {
        validate_markers(markers)?;
    }

    for key in section.env.keys() {
        if key.is_empty() || key.contains('=') {
            return Err(TestrunError::ConfigError(format!(
                "[runner.env] has invalid variable name '{key}'"
            )));
        }
    }

    Ok(RunnerConfig {
        command: section.command,
        cwd: section.cwd,
        timeout,
        kill_grace,
        shell: section.shell,
        exit_code: section.exit_code,
        project_markers: section.project_markers,
        env: section.env,
    })
}

/// Shared by config validation and settings resolution (trailing CLI args).
pub(crate) fn validate_command(command: &[String], origin: &str) -> Result<()> {
    match command.first() {
        None => Err(TestrunError::ConfigError(format!(
            "{origin} must contain at least the program to run"
        ))),
        Some(program) if program.trim().is_empty() => Err(TestrunError::ConfigError(format!(
            "{origin} has an empty program name"
        ))),
        Some(_) => Ok(()),
    }
}

/// Zero timeouts would kill every run before it starts.
pub(crate) fn ensure_positive(d: Duration, origin: &str) -> Result<Duration> {
    if d.is_zero() {
        return Err(TestrunError::ConfigError(format!(
            "{origin} must be greater than zero"
        )));
    }
    Ok(d)
}

fn parse_config_duration(s: &str, origin: &str) -> Result<Duration> {
    parse_duration(s).map_err(|e| TestrunError::ConfigError(format!("{origin}: {e}")))
}

fn parse_positive_duration(s: &str, origin: &str) -> Result<Duration> {
    ensure_positive(parse_config_duration(s, origin)?, origin)
}

fn validate_markers(markers: &[String]) -> Result<()> {
    if markers.is_empty() {
        return Err(TestrunError::ConfigError(
            "[runner].project_markers must not be empty when set".to_string(),
        ));
    }
    for marker in markers {
        if marker.trim().is_empty() || marker.contains('/') || marker.contains('\\') {
            return Err(TestrunError::ConfigError(format!(
                "[runner].project_markers entry '{marker}' must be a plain file name"
            )));
        }
    }
    Ok(())
}
