//! Rendering error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Template failed to parse or to render
    #[error("Template error: {0}")]
    Template(String),

    /// Template or output file could not be read or written
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
