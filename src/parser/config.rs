//! Parser and writer for the `.treeprune` configuration file.
//!
//! The format is one `key: value` pair per line; `#` starts a comment line.
//! Unknown keys are ignored so older binaries can read newer files.

use anyhow::{Result, bail};

pub const DEFAULT_OUTPUT: &str = "TREE.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub include_files: bool,
    pub hidden: bool,
    pub git_ignore: bool,
    pub clipboard: Option<String>,
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_files: false,
            hidden: false,
            git_ignore: true,
            clipboard: None,
            output: DEFAULT_OUTPUT.to_string(),
        }
    }
}

pub fn parse(input: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("expected `key: value` at line {}", idx + 1);
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "include_files" => cfg.include_files = parse_bool(key, value, idx)?,
            "hidden" => cfg.hidden = parse_bool(key, value, idx)?,
            "git_ignore" => cfg.git_ignore = parse_bool(key, value, idx)?,
            "clipboard" => {
                cfg.clipboard = (!value.is_empty()).then(|| value.to_string());
            }
            "output" => {
                if !value.is_empty() {
                    cfg.output = value.to_string();
                }
            }
            _ => {
                tracing::debug!(key, line = idx + 1, "ignoring unknown config key");
            }
        }
    }

    Ok(cfg)
}

fn parse_bool(key: &str, value: &str, idx: usize) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => bail!(
            "invalid value {:?} for `{}` at line {} (expected true or false)",
            other,
            key,
            idx + 1
        ),
    }
}

pub fn serialize(config: &Config) -> String {
    let clipboard = config
        .clipboard
        .as_deref()
        .map(|c| format!(" {c}"))
        .unwrap_or_default();
    format!(
        "\
# treeprune configuration

# List files as well as directories when scanning
include_files: {}

# Include dotfiles and dot-directories when scanning
hidden: {}

# Skip entries excluded by .gitignore when scanning
git_ignore: {}

# Command that receives copied text on stdin (falls back to $TREEPRUNE_CLIPBOARD,
# then a platform default such as pbcopy, clip, wl-copy or xclip)
clipboard:{}

# File written by `w` in the viewer and by `prune --output` without a path
output: {}
",
        config.include_files, config.hidden, config.git_ignore, clipboard, config.output
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_CONTENTS: &str = "\
# treeprune configuration

# List files as well as directories when scanning
include_files: false

# Include dotfiles and dot-directories when scanning
hidden: false

# Skip entries excluded by .gitignore when scanning
git_ignore: true

# Command that receives copied text on stdin (falls back to $TREEPRUNE_CLIPBOARD,
# then a platform default such as pbcopy, clip, wl-copy or xclip)
clipboard:

# File written by `w` in the viewer and by `prune --output` without a path
output: TREE.md
";

    #[test]
    fn defaults_file_parses_to_defaults() {
        assert_eq!(parse(DEFAULT_CONTENTS).unwrap(), Config::default());
    }

    #[test]
    fn serialize_round_trips() {
        let cfg = Config {
            include_files: true,
            hidden: true,
            git_ignore: false,
            clipboard: Some("xsel --clipboard --input".to_string()),
            output: "docs/layout.md".to_string(),
        };
        assert_eq!(parse(&serialize(&cfg)).unwrap(), cfg);
        assert_eq!(serialize(&Config::default()), DEFAULT_CONTENTS);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = parse("theme: dark\ninclude_files: yes\n").unwrap();
        assert!(cfg.include_files);
    }

    #[test]
    fn bad_bool_reports_line() {
        let err = parse("# c\nhidden: maybe\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn missing_colon_is_an_error() {
        assert!(parse("include_files true\n").is_err());
    }
}
