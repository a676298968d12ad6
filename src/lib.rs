//! gha-docs - documentation generator for GitHub Action manifests
//!
//! Loads an `action.yml`, fills in defaults, and renders a README with an
//! inputs table, an outputs table, and a usage example.

pub mod cli;
pub mod config;
pub mod manifest;
pub mod render;

pub use config::Config;
pub use manifest::{InputSpec, Manifest, ManifestError, ManifestLoader, OutputSpec};
pub use render::{DocRenderer, PlaceholderStyle, RenderError};
