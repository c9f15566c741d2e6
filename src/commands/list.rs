//! `treeprune list`: print every decoded node with its id, depth and state.

use anyhow::Result;
use crossterm::style::Stylize;

use crate::commands::source::{Settings, SourceArgs};
use crate::parser::patterns::IgnoreList;
use crate::parser::tree;
use crate::tree::model::Forest;
use crate::tree::visibility::Visibility;

pub fn run(source: &SourceArgs, extra_patterns: &[String]) -> Result<()> {
    let settings = Settings::load()?;
    let text = source.fetch(&settings)?;

    let mut ignore = IgnoreList::compile(&settings.ignore_text);
    for pattern in extra_patterns {
        ignore.push(pattern);
    }
    let mut forest = tree::parse(&text);
    Visibility::new(ignore).recompute(&mut forest);

    let rows = list_nodes(&forest);
    if rows.is_empty() {
        println!("  No nodes.");
        return Ok(());
    }
    for (row, active) in rows {
        if active {
            println!("  {}", row);
        } else {
            println!("  {}", row.dark_grey());
        }
    }
    Ok(())
}

/// One line per node in document order, paired with its active flag.
fn list_nodes(forest: &Forest) -> Vec<(String, bool)> {
    forest
        .nodes()
        .iter()
        .map(|n| {
            let state = if n.is_active { "active" } else { "hidden" };
            let kind = if n.is_directory { "dir" } else { "file" };
            let row = format!(
                "{:<9} {:>3}  {:<6} {:<4} {}",
                n.id.to_string(),
                n.depth,
                state,
                kind,
                forest.path_of(n.id)
            );
            (row, n.is_active)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_document_order() {
        let mut forest = tree::parse("root\n├── a\n│   └── b.txt\n└── c\n");
        Visibility::new(IgnoreList::compile("a")).recompute(&mut forest);
        let rows = list_nodes(&forest);
        assert_eq!(
            rows,
            vec![
                ("node-0      0  active dir  root".to_string(), true),
                ("node-1      1  hidden dir  root/a".to_string(), false),
                ("node-2      2  hidden file root/a/b.txt".to_string(), false),
                ("node-3      1  active dir  root/c".to_string(), true),
            ]
        );
    }

    #[test]
    fn empty_forest_lists_nothing() {
        assert!(list_nodes(&Forest::new()).is_empty());
    }
}
