//! Copy text to the system clipboard through an external command.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::PruneError;

/// Pipe `text` into the resolved clipboard command.
pub fn copy(text: &str, config_command: Option<&str>) -> Result<(), PruneError> {
    let command = resolve_command(config_command.map(str::to_string), |key| {
        std::env::var(key).ok()
    });
    let denied = |reason: String| PruneError::ClipboardDenied {
        command: command.clone(),
        reason,
    };

    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| denied("no clipboard command configured".to_string()))?;

    debug!(command = %command, bytes = text.len(), "copying to clipboard");
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| denied(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| denied(e.to_string()))?;
    }
    let status = child.wait().map_err(|e| denied(e.to_string()))?;
    if !status.success() {
        return Err(denied(format!("exited with {status}")));
    }
    Ok(())
}

/// Pick the clipboard command: config, then `$TREEPRUNE_CLIPBOARD`, then a
/// platform default.
fn resolve_command(
    config_command: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> String {
    if let Some(c) = config_command.filter(|v| !v.trim().is_empty()) {
        return c;
    }
    if let Some(c) = env("TREEPRUNE_CLIPBOARD").filter(|v| !v.trim().is_empty()) {
        return c;
    }
    if cfg!(target_os = "macos") {
        "pbcopy".to_string()
    } else if cfg!(windows) {
        "clip".to_string()
    } else if env("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty()) {
        "wl-copy".to_string()
    } else {
        "xclip -selection clipboard".to_string()
    }
}
