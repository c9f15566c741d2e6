//! Per-line decoding of box-drawing tree text.
//!
//! A line looks like `<prefix><connector><name>` where the prefix is a run of
//! spaces and `│` continuation glyphs and the connector is `├── ` or `└── `.
//! Root lines carry neither.

pub const MID_CONNECTOR: &str = "├──";
pub const LAST_CONNECTOR: &str = "└──";
pub const CONTINUATION: char = '│';

/// Indentation units per nesting level.
const UNITS_PER_LEVEL: usize = 4;

/// The decoded parts of a single tree-text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub depth: usize,
    pub name: String,
    pub prefix: String,
    pub connector: String,
}

/// Decode one line. Never fails: anything unrecognised is a depth-0 root whose
/// name is the trimmed line.
pub fn classify(line: &str) -> ClassifiedLine {
    ClassifiedLine {
        depth: depth_of(line),
        name: extract_name(line),
        prefix: extract_prefix(line).to_string(),
        connector: extract_connector(line).to_string(),
    }
}

/// Nesting depth derived from the indentation before the first connector.
///
/// Spaces count one unit, `│` counts four; every four units is one level and
/// the connector itself adds one more.
pub fn depth_of(line: &str) -> usize {
    let Some(at) = connector_index(line) else {
        return 0;
    };
    let units: usize = line[..at]
        .chars()
        .map(|c| match c {
            ' ' => 1,
            CONTINUATION => UNITS_PER_LEVEL,
            _ => 0,
        })
        .sum();
    units / UNITS_PER_LEVEL + 1
}

/// True unless the name looks like `file.ext` (a `.` and no trailing separator).
pub fn is_directory_name(name: &str) -> bool {
    !name.contains('.') || name.ends_with('/') || name.ends_with('\\')
}

fn connector_index(line: &str) -> Option<usize> {
    match (line.find(MID_CONNECTOR), line.find(LAST_CONNECTOR)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn is_prefix_char(c: char) -> bool {
    c.is_whitespace() || c == CONTINUATION
}

fn extract_prefix(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !is_prefix_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

/// Connector glyph plus the whitespace that follows it, verbatim.
fn extract_connector(line: &str) -> &str {
    let Some(at) = connector_index(line) else {
        return "";
    };
    let glyph_end = at + MID_CONNECTOR.len();
    let rest = &line[glyph_end..];
    let ws = rest.len() - rest.trim_start().len();
    &line[at..glyph_end + ws]
}

fn extract_name(line: &str) -> String {
    let body = line.trim_start_matches(is_prefix_char);
    let body = body
        .strip_prefix(MID_CONNECTOR)
        .or_else(|| body.strip_prefix(LAST_CONNECTOR))
        .map(str::trim_start)
        .unwrap_or(body);
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_line_has_depth_zero() {
        let c = classify("my-project");
        assert_eq!(c.depth, 0);
        assert_eq!(c.name, "my-project");
        assert_eq!(c.prefix, "");
        assert_eq!(c.connector, "");
    }

    #[test]
    fn first_level_entry() {
        let c = classify("├── src");
        assert_eq!(c.depth, 1);
        assert_eq!(c.name, "src");
        assert_eq!(c.prefix, "");
        assert_eq!(c.connector, "├── ");
    }

    #[test]
    fn continuation_bar_counts_as_a_level() {
        let c = classify("│   └── main.rs");
        assert_eq!(c.depth, 2);
        assert_eq!(c.name, "main.rs");
        assert_eq!(c.prefix, "│   ");
        assert_eq!(c.connector, "└── ");
    }

    #[test]
    fn plain_space_indentation() {
        let c = classify("    └── lib.rs");
        assert_eq!(c.depth, 2);
        assert_eq!(c.prefix, "    ");
        let c = classify("        ├── deep");
        assert_eq!(c.depth, 3);
    }

    #[test]
    fn stacked_continuation_bars_grow_depth() {
        // 4 + 3 + 4 + 3 = 14 units -> 3 levels + 1.
        let c = classify("│   │   └── x");
        assert_eq!(c.depth, 4);
        assert_eq!(c.prefix, "│   │   ");
    }

    #[test]
    fn earliest_connector_decides_depth() {
        let c = classify("├── weird └── name");
        assert_eq!(c.depth, 1);
        assert_eq!(c.connector, "├── ");
        assert_eq!(c.name, "weird └── name");
    }

    #[test]
    fn connector_keeps_extra_whitespace() {
        let c = classify("└──   spaced");
        assert_eq!(c.connector, "└──   ");
        assert_eq!(c.name, "spaced");
    }

    #[test]
    fn malformed_line_degrades_to_root() {
        let c = classify("  -- not a tree line  ");
        assert_eq!(c.depth, 0);
        assert_eq!(c.name, "-- not a tree line");
        assert_eq!(c.prefix, "  ");
        assert_eq!(c.connector, "");
    }

    #[test]
    fn directory_heuristic() {
        assert!(is_directory_name("src"));
        assert!(is_directory_name("v1.2/"));
        assert!(is_directory_name("dir.d\\"));
        assert!(!is_directory_name("main.rs"));
        assert!(!is_directory_name(".gitignore"));
    }
}
