// src/config/discover.rs

//! Project-root discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::fs::FileSystem;

/// Marker used when the config does not name any.
pub const DEFAULT_PROJECT_MARKERS: &[&str] = &["package.json"];

/// Walk from `start` up through its ancestors and return the first directory
/// that contains any of `markers` as a file.
pub fn discover_project_root(
    fs: &dyn FileSystem,
    start: &Path,
    markers: &[String],
) -> Option<PathBuf> {
    for dir in start.ancestors() {
        trace!(dir = ?dir, "checking for project markers");
        if let Some(marker) = markers.iter().find(|m| fs.is_file(&dir.join(m))) {
            debug!(root = ?dir, marker = %marker, "discovered project root");
            return Some(dir.to_path_buf());
        }
    }
    None
}

pub fn default_markers() -> Vec<String> {
    DEFAULT_PROJECT_MARKERS.iter().map(|s| s.to_string()).collect()
}
