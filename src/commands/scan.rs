//! `treeprune scan`: print a directory as unfiltered tree text.

use anyhow::Result;

use crate::commands::source::Settings;
use crate::scanner::tree;

pub fn run(dir: &str, files: bool, hidden: bool) -> Result<()> {
    let settings = Settings::load()?;
    let text = tree::read_directory_tree(dir, &settings.scan_options(files, hidden))?;
    print!("{}", text);
    Ok(())
}
