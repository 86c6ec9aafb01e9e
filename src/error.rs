//! Crate-level error types.

use std::fmt;

/// Errors produced by the viso-geom crate.
///
/// Only construction and configuration paths return errors. Appending
/// geometry, recoloring and drawing never fail.
#[derive(Debug)]
pub enum GeomError {
    /// A procedural template was requested with unusable tessellation
    /// parameters.
    InvalidTemplate(String),
    /// Rendering backend failure (buffer creation, upload).
    Backend(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTemplate(msg) => {
                write!(f, "invalid template: {msg}")
            }
            Self::Backend(msg) => write!(f, "backend error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for GeomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeomError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
