//! Where tree text comes from, plus the settings every command shares.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::parser::config::Config;
use crate::scanner::tree::{self, ScanOptions};
use crate::workspace;

/// Command-line selection of the tree text to work on.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Directory to scan (defaults to the working directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<String>,
    /// Read tree text from FILE instead of scanning; `-` reads stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// List files as well as directories when scanning
    #[arg(long)]
    pub files: bool,
    /// Include dotfiles when scanning
    #[arg(long)]
    pub hidden: bool,
}

impl SourceArgs {
    pub fn tree_source(&self) -> TreeSource {
        TreeSource::new(self.dir.clone(), self.input.clone())
    }

    pub fn fetch(&self, settings: &Settings) -> Result<String> {
        self.tree_source()
            .fetch(&settings.scan_options(self.files, self.hidden))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// Scan this directory.
    Directory(String),
    /// Read ready-made tree text from a file.
    File(PathBuf),
    Stdin,
}

impl TreeSource {
    /// `--input` wins over a positional directory; `-` means stdin. With
    /// neither, the working directory is scanned.
    pub fn new(dir: Option<String>, input: Option<PathBuf>) -> Self {
        match input {
            Some(p) if p.as_os_str() == "-" => Self::Stdin,
            Some(p) => Self::File(p),
            None => Self::Directory(dir.unwrap_or_else(|| ".".to_string())),
        }
    }

    pub fn fetch(&self, opts: &ScanOptions) -> Result<String> {
        match self {
            Self::Directory(dir) => Ok(tree::read_directory_tree(dir, opts)?),
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read tree text from {}", path.display())),
            Self::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read tree text from stdin")?;
                Ok(text)
            }
        }
    }

    /// Stdin can only be read once.
    pub fn can_refetch(&self) -> bool {
        !matches!(self, Self::Stdin)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Directory(dir) => dir.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Config and ignore patterns discovered from the working directory.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub root: Option<PathBuf>,
    pub config: Config,
    pub ignore_text: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let root = workspace::find_root();
        let config = workspace::load_config(root.as_deref())?;
        let ignore_text = workspace::load_ignore_text(root.as_deref())?;
        Ok(Self {
            root,
            config,
            ignore_text,
        })
    }

    /// Scan options from config, with command-line switches forcing extras on.
    pub fn scan_options(&self, files: bool, hidden: bool) -> ScanOptions {
        let mut opts = ScanOptions::from(&self.config);
        opts.include_files |= files;
        opts.hidden |= hidden;
        opts
    }

    /// Where exports go when no explicit path is given.
    pub fn output_path(&self) -> PathBuf {
        let output = PathBuf::from(&self.config.output);
        match &self.root {
            Some(root) if output.is_relative() => root.join(output),
            _ => output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_wins_over_directory() {
        let src = TreeSource::new(Some("src".into()), Some(PathBuf::from("tree.txt")));
        assert_eq!(src, TreeSource::File(PathBuf::from("tree.txt")));
    }

    #[test]
    fn dash_means_stdin() {
        let src = TreeSource::new(None, Some(PathBuf::from("-")));
        assert_eq!(src, TreeSource::Stdin);
        assert!(!src.can_refetch());
    }

    #[test]
    fn defaults_to_working_directory() {
        assert_eq!(TreeSource::new(None, None), TreeSource::Directory(".".into()));
    }

    #[test]
    fn switches_only_add_to_config() {
        let settings = Settings {
            config: Config {
                include_files: true,
                ..Config::default()
            },
            ..Settings::default()
        };
        let opts = settings.scan_options(false, true);
        assert!(opts.include_files);
        assert!(opts.hidden);
    }

    #[test]
    fn relative_output_is_anchored_at_root() {
        let settings = Settings {
            root: Some(PathBuf::from("/work")),
            ..Settings::default()
        };
        assert_eq!(settings.output_path(), PathBuf::from("/work/TREE.md"));
        assert_eq!(Settings::default().output_path(), PathBuf::from("TREE.md"));
    }

    #[test]
    fn file_source_reads_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tree.txt");
        fs::write(&path, "root\n└── a\n").unwrap();
        let text = TreeSource::File(path).fetch(&ScanOptions::default()).unwrap();
        assert_eq!(text, "root\n└── a\n");
    }
}
