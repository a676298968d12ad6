//! Manifest loading error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or parsing an action manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Manifest file exists but could not be read
    #[error("Failed to read manifest '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Contents are not a valid action manifest
    #[error("Failed to parse manifest: {0}")]
    Parse(String),
}

/// The remote URL of a directory could not be determined.
///
/// Never fatal: the loader logs it and falls back to the directory name.
#[derive(Debug, Error)]
pub enum DerivationUnavailable {
    /// The version-control client could not be started
    #[error("could not run '{program}': {source}")]
    ClientMissing {
        program: String,
        source: std::io::Error,
    },

    /// The client ran but exited unsuccessfully (usually "not a git repository")
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The client printed nothing
    #[error("no remote url configured")]
    EmptyUrl,
}
