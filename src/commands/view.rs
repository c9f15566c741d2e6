use anyhow::Result;

use crate::commands::source::SourceArgs;
use crate::tui::app;

pub fn run(source: &SourceArgs, demo: bool) -> Result<()> {
    app::run(source, demo)
}
