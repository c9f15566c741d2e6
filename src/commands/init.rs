//! `treeprune init`: write a starter config and ignore file.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::parser::config;
use crate::workspace;

pub const IGNORE_DEFAULTS: &str = "\
# treeprune ignore patterns: one name per line, matched case-insensitively.
# `*` is the only wildcard (e.g. `*.log`, `node_*`). A lone `*` is ignored.
.git
node_modules
target
__pycache__
.venv
dist
*.pyc
.DS_Store
";

pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let config_path = workspace::config_path(root);
    if config_path.exists() {
        bail!(
            "treeprune is already initialised ({} exists)",
            workspace::CONFIG_FILE
        );
    }

    fs::write(&config_path, config::serialize(&config::Config::default()))?;
    println!("  {} {}", "Created".green().bold(), workspace::CONFIG_FILE);

    let ignore_path = workspace::ignore_path(root);
    if ignore_path.exists() {
        println!(
            "  {} {} (already present)",
            "Kept".dark_grey().bold(),
            workspace::IGNORE_FILE
        );
    } else {
        fs::write(&ignore_path, IGNORE_DEFAULTS)?;
        println!("  {} {}", "Created".green().bold(), workspace::IGNORE_FILE);
    }
    Ok(())
}
