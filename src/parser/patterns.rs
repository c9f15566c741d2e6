//! Ignore-pattern compilation.
//!
//! One pattern per line. `*` is the only wildcard; everything else matches
//! literally. Matching is case-insensitive and anchored at both ends.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
enum Matcher {
    /// Lowercased literal compared for whole-name equality.
    Exact(String),
    Wildcard(Regex),
}

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    matcher: Matcher,
}

impl Pattern {
    fn compile(source: &str) -> Self {
        let matcher = if source.contains('*') {
            match wildcard_regex(source) {
                Ok(re) => Matcher::Wildcard(re),
                Err(err) => {
                    warn!(pattern = source, error = %err, "wildcard pattern rejected, matching literally");
                    Matcher::Exact(source.to_lowercase())
                }
            }
        } else {
            Matcher::Exact(source.to_lowercase())
        };
        Self {
            source: source.to_string(),
            matcher,
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(folded) => name.to_lowercase() == *folded,
            Matcher::Wildcard(re) => re.is_match(name),
        }
    }
}

fn wildcard_regex(source: &str) -> Result<Regex, regex::Error> {
    let body = source
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&format!("^{body}$"))
        .case_insensitive(true)
        .build()
}

/// A compiled list of ignore patterns.
///
/// Each entry keeps its source text so it can be listed, removed, and written
/// back out.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile freeform pattern text.
    ///
    /// Lines are trimmed; empty lines and a lone `*` are dropped so a stray
    /// wildcard never hides the entire tree.
    pub fn compile(text: &str) -> Self {
        let mut list = Self::new();
        for line in text.lines() {
            list.push(line);
        }
        debug!(patterns = list.len(), "compiled ignore patterns");
        list
    }

    /// Add one pattern. Returns false when it was dropped or already present.
    pub fn push(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern == "*" || self.contains(pattern) {
            return false;
        }
        self.patterns.push(Pattern::compile(pattern));
        true
    }

    /// Remove a pattern by its source text (case-insensitive).
    pub fn remove(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        let before = self.patterns.len();
        self.patterns
            .retain(|p| !p.source.eq_ignore_ascii_case(pattern));
        self.patterns.len() != before
    }

    pub fn contains(&self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        self.patterns
            .iter()
            .any(|p| p.source.eq_ignore_ascii_case(pattern))
    }

    /// True if any pattern matches `name`.
    pub fn is_match(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern sources in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    pub fn to_text(&self) -> String {
        self.patterns().collect::<Vec<_>>().join("\n")
    }

    /// A list holding just `pattern`, compiled the same way.
    pub fn single(pattern: &str) -> Self {
        let mut list = Self::new();
        list.push(pattern);
        list
    }
}

/// Strip `#` comment lines from an ignore file before compiling it.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_case_insensitive() {
        let list = IgnoreList::compile("Build");
        assert!(list.is_match("build"));
        assert!(list.is_match("BUILD"));
        assert!(!list.is_match("builds"));
        assert!(!list.is_match("rebuild"));
    }

    #[test]
    fn wildcard_prefix() {
        let list = IgnoreList::compile("node_*");
        assert!(list.is_match("node_modules"));
        assert!(list.is_match("NODE_cache"));
        assert!(!list.is_match("nodeX"));
        assert!(!list.is_match("other"));
    }

    #[test]
    fn star_matches_any_run_including_empty() {
        let list = IgnoreList::compile("node*");
        assert!(list.is_match("node_modules"));
        assert!(list.is_match("nodeX"));
        assert!(list.is_match("node"));
        assert!(!list.is_match("other"));
    }

    #[test]
    fn wildcard_is_anchored() {
        let list = IgnoreList::compile("*.log");
        assert!(list.is_match("build.log"));
        assert!(!list.is_match("build.log.gz"));
        let list = IgnoreList::compile("a*c");
        assert!(list.is_match("abc"));
        assert!(!list.is_match("xabc"));
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        let list = IgnoreList::compile("*.rs\n(draft)*\nfile[1]");
        assert!(list.is_match("main.rs"));
        assert!(!list.is_match("mainXrs"));
        assert!(list.is_match("(draft) notes"));
        assert!(list.is_match("FILE[1]"));
        assert!(!list.is_match("file1"));
    }

    #[test]
    fn blank_lines_and_lone_star_are_dropped() {
        let list = IgnoreList::compile("\n  *  \n   \ntarget\n");
        assert_eq!(list.patterns().collect::<Vec<_>>(), vec!["target"]);
        assert!(!list.is_match("anything"));
    }

    #[test]
    fn any_pattern_matches() {
        let list = IgnoreList::compile("target\n*.tmp\n.git");
        assert!(list.is_match("target"));
        assert!(list.is_match("x.TMP"));
        assert!(list.is_match(".git"));
        assert!(!list.is_match("src"));
    }

    #[test]
    fn push_deduplicates_and_remove_drops() {
        let mut list = IgnoreList::compile("target");
        assert!(!list.push("TARGET"));
        assert!(list.push("dist"));
        assert_eq!(list.to_text(), "target\ndist");
        assert!(list.remove("Target"));
        assert!(!list.remove("target"));
        assert!(!list.is_match("target"));
        assert!(list.is_match("dist"));
    }

    #[test]
    fn comments_are_stripped_from_files() {
        let text = "# build output\ntarget\n  # indented comment\n*.log\n";
        let list = IgnoreList::compile(&strip_comments(text));
        assert_eq!(list.patterns().collect::<Vec<_>>(), vec!["target", "*.log"]);
    }
}
