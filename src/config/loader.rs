// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TestrunError};
use crate::fs::{FileSystem, RealFileSystem};

/// File name looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Testrun.toml";

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; durations and the command are
/// checked by [`load_and_validate_with`].
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| TestrunError::ConfigError(format!("{e:#}")))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load and validate a configuration file through the given filesystem.
pub fn load_and_validate_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load and validate a configuration file from disk.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with(&RealFileSystem, path)
}

/// Decide which config file (if any) applies.
///
/// - An explicit path must exist.
/// - Otherwise `Testrun.toml` in `cwd` is used when present.
/// - Otherwise there is no config file and defaults apply.
pub fn locate_config(
    fs: &dyn FileSystem,
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        if !fs.is_file(&path) {
            return Err(TestrunError::ConfigError(format!(
                "config file {:?} does not exist",
                path
            )));
        }
        return Ok(Some(path));
    }

    let default = cwd.join(DEFAULT_CONFIG_FILE);
    if fs.is_file(&default) {
        debug!(path = ?default, "using config file from current directory");
        Ok(Some(default))
    } else {
        debug!("no config file found; using defaults");
        Ok(None)
    }
}
