// src/config/mod.rs

//! Configuration for testrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate durations, command and markers (`validate.rs`).
//! - Find the project root (`discover.rs`).
//! - Merge CLI flags, environment, config and defaults (`resolve.rs`).

pub mod discover;
pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use discover::discover_project_root;
pub use loader::{load_and_validate, load_and_validate_with, load_from_path, locate_config};
pub use model::{ConfigFile, RawConfigFile, RunnerConfig, RunnerSection};
pub use resolve::{DirSource, ResolveContext, RunSettings, resolve_settings};
