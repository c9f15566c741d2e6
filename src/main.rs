mod clipboard;
mod commands;
mod error;
mod parser;
mod scanner;
mod tree;
mod tui;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::prune::PruneArgs;
use commands::source::SourceArgs;

/// Environment variable holding the log filter, e.g. `TREEPRUNE_LOG=debug`.
const LOG_ENV: &str = "TREEPRUNE_LOG";

#[derive(Parser)]
#[command(
    name = "treeprune",
    about = "Decode box-drawing directory trees and prune them by hand or by pattern"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default .treeprune and .treepruneignore in the current directory
    Init,
    /// Print a directory as tree text, without filtering
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: String,
        /// List files as well as directories
        #[arg(long)]
        files: bool,
        /// Include dotfiles
        #[arg(long)]
        hidden: bool,
    },
    /// Filter tree text with ignore patterns and toggles, then print, copy or write it
    Prune(PruneArgs),
    /// Show every decoded node with its depth and visibility
    List {
        #[command(flatten)]
        source: SourceArgs,
        /// Extra ignore pattern (repeatable)
        #[arg(long, short = 'x', value_name = "PATTERN")]
        ignore: Vec<String>,
    },
    /// Open the interactive pruning view
    View {
        #[command(flatten)]
        source: SourceArgs,
        /// Launch with a built-in sample tree (nothing is read or written)
        #[arg(long)]
        demo: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init only happens in tests; ignore it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init => commands::init::run(),
        Command::Scan { dir, files, hidden } => commands::scan::run(&dir, files, hidden),
        Command::Prune(args) => commands::prune::run(args),
        Command::List { source, ignore } => commands::list::run(&source, &ignore),
        Command::View { source, demo } => commands::view::run(&source, demo),
    }
}
