//! Decoder and filtered writer for box-drawing tree text.
//!
//! The central invariant: with every node active, `serialize(&parse(input))`
//! reproduces `input` line for line (blank lines excepted), because each node
//! keeps its original prefix and connector verbatim.

use tracing::{debug, trace};

use crate::parser::line::{self, classify};
use crate::tree::model::{Forest, NodeId};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse tree text into a forest. Blank and whitespace-only lines are dropped.
pub fn parse(input: &str) -> Forest {
    build(input.lines().filter(|l| !l.trim().is_empty()))
}

/// Reconstruct the hierarchy from lines in document order.
///
/// Keeps a stack of open ancestors: entries at the same or greater depth than
/// the incoming line are closed, the remaining top (if any) becomes its parent.
pub fn build<'a, I>(lines: I) -> Forest
where
    I: IntoIterator<Item = &'a str>,
{
    let mut forest = Forest::new();
    let mut open: Vec<(NodeId, usize)> = Vec::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let decoded = classify(raw);
        trace!(
            line = index,
            depth = decoded.depth,
            name = %decoded.name,
            "classified tree line"
        );

        while open.last().is_some_and(|(_, depth)| *depth >= decoded.depth) {
            open.pop();
        }
        let parent = open.last().map(|(id, _)| *id);

        let is_directory = line::is_directory_name(&decoded.name);
        let depth = decoded.depth;
        let id = forest.push(
            parent,
            decoded.name,
            depth,
            is_directory,
            decoded.prefix,
            decoded.connector,
        );
        open.push((id, depth));
    }

    debug!(
        nodes = forest.len(),
        roots = forest.roots().len(),
        "parsed tree text"
    );
    forest
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Emit the active part of the forest as tree text.
///
/// An inactive node is skipped together with its whole subtree, whatever the
/// state of its descendants. A leading depth-0 root is written bare as the
/// label line; everything else is `prefix + connector + name`.
pub fn serialize(forest: &Forest) -> String {
    let mut out = String::new();
    let label = forest
        .roots()
        .first()
        .copied()
        .filter(|id| forest[*id].depth == 0);

    let mut stack: Vec<NodeId> = forest.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let node = &forest[id];
        if !node.is_active {
            continue;
        }
        if Some(id) != label {
            out.push_str(&node.prefix);
            out.push_str(&node.connector);
        }
        out.push_str(&node.name);
        out.push('\n');
        stack.extend(node.children.iter().rev().copied());
    }
    out
}
