//! Failures of the collaborators around the tree core.
//!
//! Parsing, filtering and serialising never fail; only fetching tree text and
//! exporting the result can.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    /// No usable directory path was given.
    #[error("enter a valid directory path")]
    InvalidPath,

    /// The directory could not be walked.
    #[error("failed to read directory tree at {}", path.display())]
    Fetch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The clipboard command could not be run or rejected the text.
    #[error("cannot copy to clipboard with `{command}`: {reason}")]
    ClipboardDenied { command: String, reason: String },

    /// The user abandoned the session before exporting anything.
    #[error("cancelled by user")]
    Cancelled,
}

impl PruneError {
    pub(crate) fn fetch(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        Self::Fetch {
            path: path.into(),
            source: source.into(),
        }
    }
}
