//! Filesystem scanner that produces box-drawing tree text.
//!
//! Uses the `ignore` crate (same engine as ripgrep) for `.gitignore` handling.
//! This is the producer side of the decoder in `parser::tree`: the text it
//! renders uses exactly the connector and continuation spacing the decoder
//! expects.

use std::io;
use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::error::PruneError;
use crate::parser::config::Config;

/// What the scanner lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub include_files: bool,
    pub hidden: bool,
    pub git_ignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_files: false,
            hidden: false,
            git_ignore: true,
        }
    }
}

impl From<&Config> for ScanOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            include_files: cfg.include_files,
            hidden: cfg.hidden,
            git_ignore: cfg.git_ignore,
        }
    }
}

/// Scan `path` and render it as tree text with its directory name as label.
pub fn read_directory_tree(path: &str, opts: &ScanOptions) -> Result<String, PruneError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PruneError::InvalidPath);
    }
    let root = Path::new(path);
    let entries = scan(root, opts)?;
    Ok(render(&label_for(root), &entries))
}

/// Walk `root` and return entries relative to it.
///
/// Directory paths end with `/`. `.git/` is always skipped. The result is
/// sorted so that folders precede files at each level and descendants stay
/// grouped under their folder.
pub fn scan(root: &Path, opts: &ScanOptions) -> Result<Vec<String>, PruneError> {
    if !root.is_dir() {
        return Err(PruneError::fetch(
            root,
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!opts.hidden)
        .git_ignore(opts.git_ignore)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .require_git(false);

    let mut entries: Vec<String> = Vec::new();

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path == root {
            continue;
        }
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if !is_dir && !opts.include_files {
            continue;
        }

        let Some(rel) = relative_to(root, path) else {
            continue;
        };
        if is_excluded(&rel) {
            continue;
        }
        entries.push(if is_dir { format!("{rel}/") } else { rel });
    }

    entries.sort_by(|a, b| compare_hierarchical(a, b));
    debug!(root = %root.display(), entries = entries.len(), "scanned directory");
    Ok(entries)
}

/// Render scanner output as tree text under a bare `label` line.
pub fn render(label: &str, entries: &[String]) -> String {
    let mut top: Vec<Entry> = Vec::new();
    for path in entries {
        insert(&mut top, path);
    }

    let mut output = String::new();
    output.push_str(label);
    output.push('\n');
    render_level(&top, "", &mut output);
    output
}

#[derive(Debug)]
struct Entry {
    name: String,
    children: Vec<Entry>,
}

fn insert(level: &mut Vec<Entry>, path: &str) {
    let (comps, _) = path_components(path);
    let mut level = level;
    for comp in comps {
        let idx = match level.iter().position(|e| e.name == comp) {
            Some(idx) => idx,
            None => {
                level.push(Entry {
                    name: comp.to_string(),
                    children: Vec::new(),
                });
                level.len() - 1
            }
        };
        level = &mut level[idx].children;
    }
}

fn render_level(items: &[Entry], prefix: &str, output: &mut String) {
    let total = items.len();
    for (i, item) in items.iter().enumerate() {
        let is_last = i + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };

        output.push_str(prefix);
        output.push_str(connector);
        output.push_str(&item.name);
        output.push('\n');
        render_level(&item.children, &format!("{prefix}{child_prefix}"), output);
    }
}

fn label_for(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}

/// Path of `target` relative to `base`, as a forward-slash string.
fn relative_to(base: &Path, target: &Path) -> Option<String> {
    let rel = target.strip_prefix(base).ok()?;
    let s = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Some(s)
}

fn is_excluded(rel: &str) -> bool {
    rel.split('/').next() == Some(".git")
}

fn compare_hierarchical(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let (a_comps, a_is_dir) = path_components(a);
    let (b_comps, b_is_dir) = path_components(b);
    let min_len = a_comps.len().min(b_comps.len());

    for i in 0..min_len {
        if a_comps[i] == b_comps[i] {
            continue;
        }
        let a_kind = component_kind(i, a_comps.len(), a_is_dir);
        let b_kind = component_kind(i, b_comps.len(), b_is_dir);
        if a_kind != b_kind {
            return a_kind.cmp(&b_kind); // directory before file
        }
        return a_comps[i].cmp(b_comps[i]);
    }

    match a_comps.len().cmp(&b_comps.len()) {
        Ordering::Equal => a_is_dir.cmp(&b_is_dir).reverse(),
        other => other, // ancestor before descendant
    }
}

fn path_components(path: &str) -> (Vec<&str>, bool) {
    let is_dir = path.ends_with('/');
    let trimmed = path.trim_end_matches('/');
    let comps = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    };
    (comps, is_dir)
}

fn component_kind(idx: usize, len: usize, is_dir: bool) -> u8 {
    // 0 = directory component, 1 = file component
    if idx + 1 < len || is_dir { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::parser::tree::{parse, serialize};

    fn make_tree(root: &Path, files: &[&str]) {
        for f in files {
            let p = root.join(f);
            if f.ends_with('/') {
                fs::create_dir_all(&p).unwrap();
                continue;
            }
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&p, "").unwrap();
        }
    }

    fn tmpdir() -> tempfile::TempDir {
        tempfile::TempDir::new().unwrap()
    }

    fn with_files() -> ScanOptions {
        ScanOptions {
            include_files: true,
            ..ScanOptions::default()
        }
    }

    #[test]
    fn directories_only_by_default() {
        let dir = tmpdir();
        make_tree(dir.path(), &["src/main.rs", "README.md"]);
        let entries = scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(entries, vec!["src/".to_string()]);
    }

    #[test]
    fn files_included_on_request() {
        let dir = tmpdir();
        make_tree(dir.path(), &["src/main.rs", "README.md"]);
        let entries = scan(dir.path(), &with_files()).unwrap();
        assert_eq!(entries, vec!["src/", "src/main.rs", "README.md"]);
    }

    #[test]
    fn git_dir_excluded() {
        let dir = tmpdir();
        make_tree(dir.path(), &[".git/HEAD", "src/main.rs"]);
        let opts = ScanOptions {
            hidden: true,
            ..with_files()
        };
        let entries = scan(dir.path(), &opts).unwrap();
        assert!(!entries.iter().any(|e| e.starts_with(".git")));
    }

    #[test]
    fn gitignore_respected() {
        let dir = tmpdir();
        make_tree(dir.path(), &["src/main.rs", "dist/bundle.js"]);
        fs::write(dir.path().join(".gitignore"), "dist/\n").unwrap();
        let entries = scan(dir.path(), &with_files()).unwrap();
        assert!(!entries.iter().any(|e| e.starts_with("dist")));

        let opts = ScanOptions {
            git_ignore: false,
            ..with_files()
        };
        let entries = scan(dir.path(), &opts).unwrap();
        assert!(entries.contains(&"dist/".to_string()));
    }

    #[test]
    fn dotfiles_need_hidden() {
        let dir = tmpdir();
        make_tree(dir.path(), &[".env", "src/main.rs"]);
        assert!(!scan(dir.path(), &with_files()).unwrap().contains(&".env".to_string()));
        let opts = ScanOptions {
            hidden: true,
            ..with_files()
        };
        assert!(scan(dir.path(), &opts).unwrap().contains(&".env".to_string()));
    }

    #[test]
    fn children_grouped_with_folder_before_root_files() {
        let dir = tmpdir();
        make_tree(dir.path(), &["src/a/file.rs", "root.rs", "z/"]);
        let entries = scan(dir.path(), &with_files()).unwrap();
        assert_eq!(entries, vec!["src/", "src/a/", "src/a/file.rs", "z/", "root.rs"]);
    }

    #[test]
    fn render_uses_tree_glyphs() {
        let entries: Vec<String> = ["a/", "a/b/", "a/b/x.rs", "a/y.rs", "c.md"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let text = render("proj", &entries);
        assert_eq!(
            text,
            "\
proj
├── a
│   ├── b
│   │   └── x.rs
│   └── y.rs
└── c.md
"
        );
    }

    #[test]
    fn rendered_text_decodes_to_the_same_shape() {
        let dir = tmpdir();
        make_tree(
            dir.path(),
            &["src/parser/line.rs", "src/main.rs", "docs/guide.md", "Cargo.toml"],
        );
        let entries = scan(dir.path(), &with_files()).unwrap();
        let text = render("proj", &entries);
        let forest = parse(&text);

        assert_eq!(serialize(&forest), text);
        let line_rs = forest.find_by_path("proj/src/parser/line.rs").unwrap();
        assert_eq!(forest.path_of(line_rs), "proj/src/parser/line.rs");
        assert!(forest.find_by_path("proj/docs/guide.md").is_some());
        assert!(forest.find_by_path("proj/Cargo.toml").is_some());
    }

    #[test]
    fn blank_path_is_invalid() {
        let err = read_directory_tree("   ", &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, PruneError::InvalidPath));
    }

    #[test]
    fn missing_directory_is_a_fetch_error() {
        let dir = tmpdir();
        let missing = dir.path().join("nope");
        let err = read_directory_tree(missing.to_str().unwrap(), &ScanOptions::default())
            .unwrap_err();
        assert!(matches!(err, PruneError::Fetch { .. }));
    }

    #[test]
    fn empty_directory_renders_label_only() {
        let dir = tmpdir();
        let text = read_directory_tree(dir.path().to_str().unwrap(), &with_files()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
