//! Locations of the `.treeprune` config and `.treepruneignore` pattern file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::parser::config::{self, Config};
use crate::parser::patterns;

pub const CONFIG_FILE: &str = ".treeprune";
pub const IGNORE_FILE: &str = ".treepruneignore";

/// Walk upward from `start` to the nearest directory holding a `.treeprune` file.
pub fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Like [`find_root_from`], starting at the working directory.
pub fn find_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_root_from(&cwd)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn ignore_path(root: &Path) -> PathBuf {
    root.join(IGNORE_FILE)
}

/// The effective configuration: the discovered `.treeprune`, or defaults.
pub fn load_config(root: Option<&Path>) -> Result<Config> {
    let Some(root) = root else {
        return Ok(Config::default());
    };
    let path = config_path(root);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    config::parse(&content).with_context(|| format!("invalid config in {}", path.display()))
}

/// Ignore-pattern text from `.treepruneignore`, comments removed.
///
/// Missing files yield an empty pattern list.
pub fn load_ignore_text(root: Option<&Path>) -> Result<String> {
    let Some(path) = root.map(ignore_path).filter(|p| p.is_file()) else {
        return Ok(String::new());
    };
    read_ignore_file(&path)
}

pub fn read_ignore_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read ignore file {}", path.display()))?;
    Ok(patterns::strip_comments(&content))
}
