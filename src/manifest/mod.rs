//! Action manifest loading
//!
//! Parses an `action.yml` into a [`Manifest`], fills in defaults, and
//! optionally derives the reference path used in usage examples
//! (`owner/repo/<dir>@VERSION`).
//!
//! Inputs and outputs keep their declaration order.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::config::format_yaml_error;

mod error;
pub mod remote;

pub use error::{DerivationUnavailable, ManifestError};
pub use remote::{parse_git_url, GitRemote, RemoteLookup};

/// Input type assumed when the manifest does not declare one
pub const DEFAULT_INPUT_TYPE: &str = "string";

/// Version suffix used in derived reference paths
pub const DEFAULT_VERSION_PLACEHOLDER: &str = "VERSION";

/// A parsed action manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Action display name
    #[serde(default)]
    pub name: String,
    /// Action description
    #[serde(default)]
    pub description: String,
    /// Declared inputs, in declaration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: IndexMap<String, InputSpec>,
    /// Declared outputs, in declaration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: IndexMap<String, OutputSpec>,
    /// How the action is referenced from a workflow (derived, never read)
    #[serde(skip_deserializing)]
    pub reference: Option<String>,
}

/// A single declared input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Default value; empty means no default
    #[serde(default, rename = "default", deserialize_with = "null_as_default")]
    pub default_value: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub input_type: String,
}

/// A single declared output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(default)]
    pub description: String,
}

impl InputSpec {
    pub fn has_default(&self) -> bool {
        !self.default_value.is_empty()
    }
}

impl Manifest {
    /// Parse manifest YAML and normalize it.
    ///
    /// Empty content is rejected; on error nothing is returned.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        if content.trim().is_empty() {
            return Err(ManifestError::Parse("manifest is empty".to_string()));
        }

        let mut manifest: Manifest = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::Parse(format_yaml_error(&e)))?;
        manifest.set_input_types();
        Ok(manifest)
    }

    /// Give every input without a declared type the default type.
    pub fn set_input_types(&mut self) {
        for input in self.inputs.values_mut() {
            if input.input_type.trim().is_empty() {
                input.input_type = DEFAULT_INPUT_TYPE.to_string();
            }
        }
    }
}

/// Reads manifests from disk and attaches a reference path.
pub struct ManifestLoader {
    remote: Box<dyn RemoteLookup>,
    derive_reference: bool,
    version_placeholder: String,
}

impl ManifestLoader {
    /// Loader backed by the `git` client
    pub fn new() -> Self {
        Self::with_remote(GitRemote::new())
    }

    pub fn with_remote(remote: impl RemoteLookup + 'static) -> Self {
        Self {
            remote: Box::new(remote),
            derive_reference: true,
            version_placeholder: DEFAULT_VERSION_PLACEHOLDER.to_string(),
        }
    }

    /// Enable or disable reference derivation. Disabled means no git call.
    pub fn with_reference(mut self, enabled: bool) -> Self {
        self.derive_reference = enabled;
        self
    }

    pub fn with_version_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.version_placeholder = placeholder.into();
        self
    }

    /// Read, parse, and normalize the manifest at `path`.
    pub fn load(&self, path: &Path) -> Result<Manifest, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
            _ => ManifestError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mut manifest = Manifest::parse(&content).map_err(|e| match e {
            ManifestError::Parse(message) => {
                ManifestError::Parse(format!("'{}' {}", path.display(), message))
            }
            other => other,
        })?;

        if self.derive_reference {
            manifest.reference = self.reference_for(path);
        }

        debug!(
            "Loaded manifest '{}' ({} inputs, {} outputs)",
            manifest.name,
            manifest.inputs.len(),
            manifest.outputs.len()
        );
        Ok(manifest)
    }

    /// Best-effort reference path for the manifest at `path`.
    ///
    /// `owner/repo/<dir>@<version>` when the containing directory has a
    /// parseable git remote, otherwise just `<dir>`. `None` only when the
    /// path cannot be resolved or its directory has no name.
    pub fn reference_for(&self, path: &Path) -> Option<String> {
        // absolute without following symlinks, so the name the user sees is kept
        let absolute = match std::path::absolute(path) {
            Ok(p) => normalize(&p),
            Err(e) => {
                warn!("Cannot resolve {:?} for reference path: {}", path, e);
                return None;
            }
        };

        let dir = absolute.parent()?;
        let Some(dir_name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            warn!("Manifest directory {:?} has no name; reference left unset", dir);
            return None;
        };

        match self.remote.remote_url(dir) {
            Ok(url) => match parse_git_url(&url) {
                Some((owner, repo)) => Some(format!(
                    "{}/{}/{}@{}",
                    owner, repo, dir_name, self.version_placeholder
                )),
                None => {
                    debug!("Unrecognized remote url '{}', using directory name", url);
                    Some(dir_name)
                }
            },
            Err(e) => {
                debug!("Remote url unavailable for {:?} ({}), using directory name", dir, e);
                Some(dir_name)
            }
        }
    }
}

/// Drop `.` and fold `..` lexically
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `~` and empty values become `T::default()`. For string fields, plain
/// scalars (`false`, `3.10`) keep their source text.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests;
