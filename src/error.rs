//! Crate-level error types.
//!
//! The geometry core itself degrades by omission (malformed bonds, short
//! chains, and empty selections are skipped, not raised); errors exist only
//! for the ambient surface: options parsing, I/O, and thread spawning.

use std::fmt;

/// Errors produced by the molscene crate.
#[derive(Debug)]
pub enum SceneError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the background scene-processor thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
