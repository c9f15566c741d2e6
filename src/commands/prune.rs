//! `treeprune prune`: filter tree text non-interactively.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use crossterm::style::Stylize;

use crate::clipboard;
use crate::commands::source::{Settings, SourceArgs};
use crate::parser::patterns::IgnoreList;
use crate::parser::tree;
use crate::tree::visibility::{ToggleOutcome, Visibility};
use crate::workspace;

#[derive(Debug, Default, Args)]
pub struct PruneArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Extra ignore pattern (repeatable); `*` is the only wildcard
    #[arg(long, short = 'x', value_name = "PATTERN")]
    pub ignore: Vec<String>,
    /// Read patterns from this file instead of the discovered .treepruneignore
    #[arg(long, value_name = "FILE", conflicts_with = "no_ignore_file")]
    pub ignore_file: Option<PathBuf>,
    /// Do not read any ignore file
    #[arg(long)]
    pub no_ignore_file: bool,
    /// Toggle a node by its slash-joined name path, e.g. `proj/src` (repeatable)
    #[arg(long, short, value_name = "PATH")]
    pub toggle: Vec<String>,
    /// Copy the result to the clipboard instead of printing it
    #[arg(long)]
    pub copy: bool,
    /// Write the result to FILE (or the configured output file)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<Option<PathBuf>>,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

pub fn run(args: PruneArgs) -> Result<()> {
    let settings = Settings::load()?;
    let text = args.source.fetch(&settings)?;
    let patterns = pattern_text(&args, &settings)?;

    let outcome = compute(&text, &patterns, &args.toggle);
    for path in &outcome.blocked {
        eprintln!(
            "  {} {} (it or an ancestor is ignored)",
            "Blocked".yellow().bold(),
            path
        );
    }
    for path in &outcome.unknown {
        eprintln!("  {} {}", "Unknown".red().bold(), path);
    }

    let mut exported = false;
    if args.copy {
        clipboard::copy(&outcome.text, settings.config.clipboard.as_deref())?;
        eprintln!("  {} filtered tree to clipboard", "Copied".green().bold());
        exported = true;
    }
    if let Some(output) = &args.output {
        let path = output.clone().unwrap_or_else(|| settings.output_path());
        fs::write(&path, &outcome.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  {} {}", "Wrote".green().bold(), path.display());
        exported = true;
    }
    if !exported {
        print!("{}", outcome.text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Computation (testable, no I/O)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub text: String,
    /// Toggle paths that stayed hidden because of an ignore pattern.
    pub blocked: Vec<String>,
    /// Toggle paths that name no node.
    pub unknown: Vec<String>,
}

/// Parse `text`, apply `patterns`, then apply `toggles` in order.
pub fn compute(text: &str, patterns: &str, toggles: &[String]) -> PruneOutcome {
    let mut forest = tree::parse(text);
    let mut visibility = Visibility::default();
    visibility.set_patterns(&mut forest, patterns);

    let mut outcome = PruneOutcome::default();
    for path in toggles {
        match forest.find_by_path(path) {
            Some(id) => {
                if visibility.toggle(&mut forest, id) == ToggleOutcome::Blocked {
                    outcome.blocked.push(path.clone());
                }
            }
            None => outcome.unknown.push(path.clone()),
        }
    }
    outcome.text = tree::serialize(&forest);
    outcome
}

/// Patterns from the ignore file (explicit, or discovered) plus `--ignore`.
fn pattern_text(args: &PruneArgs, settings: &Settings) -> Result<String> {
    let mut list = if args.no_ignore_file {
        IgnoreList::new()
    } else if let Some(path) = &args.ignore_file {
        IgnoreList::compile(&workspace::read_ignore_file(path)?)
    } else {
        IgnoreList::compile(&settings.ignore_text)
    };
    for pattern in &args.ignore {
        list.push(pattern);
    }
    Ok(list.to_text())
}
