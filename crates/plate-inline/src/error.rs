use thiserror::Error;

use crate::document::{Path, Tag};

/// A selection point that does not address anything in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("no node at path {path:?}")]
    MissingNode { path: Path },

    #[error("node at {path:?} is text and cannot hold children")]
    NotAContainer { path: Path },

    #[error("node at {path:?} is not text")]
    NotText { path: Path },

    #[error("selection from {start:?} to {end:?} spans more than one text node")]
    SpansNodes { start: Path, end: Path },

    #[error("offset {offset} is out of bounds for node at {path:?} (len {len})")]
    OffsetOutOfBounds {
        path: Path,
        offset: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// Recoverable: resolve the attribute and call toggle again, or give up.
    #[error("`{tag}` needs a `{attribute}` attribute before it can be applied")]
    NeedsAttribute { tag: Tag, attribute: String },

    #[error("malformed selection range: {0}")]
    MalformedRange(#[from] RangeError),

    #[error("format tag must not be empty")]
    InvalidTag,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
}
