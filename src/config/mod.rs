//! Configuration management
//!
//! Settings are layered, lowest precedence first:
//! - built-in defaults
//! - config file (`$HOME/.gha-docs.yaml` or `--config`)
//! - environment variables (`GHA_DOCS_*`)
//! - command line flags (applied by [`crate::cli`])
//!
//! Missing optional values are filled with defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::manifest::DEFAULT_VERSION_PLACEHOLDER;
use crate::render::PlaceholderStyle;

/// Name of the config file looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".gha-docs.yaml";

/// File name used for the rendered docs when no output file is given
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "README.md";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Manifest to document
    #[serde(default = "default_action_file")]
    pub action_file: PathBuf,
    /// Where to write the docs; defaults to README.md next to the manifest
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    /// Print to stdout instead of writing the output file
    #[serde(default)]
    pub dry_run: bool,
    /// Rendering options
    #[serde(default)]
    pub render: RenderConfig,
    /// Reference path derivation options
    #[serde(default)]
    pub reference: ReferenceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            action_file: default_action_file(),
            output_file: None,
            dry_run: false,
            render: RenderConfig::default(),
            reference: ReferenceConfig::default(),
        }
    }
}

fn default_action_file() -> PathBuf {
    PathBuf::from("action.yml")
}

/// Rendering configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Placeholder used for inputs without a default
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
    /// Custom Tera template replacing the built-in one
    #[serde(default)]
    pub template: Option<PathBuf>,
    /// Render only the usage snippet
    #[serde(default)]
    pub usage_only: bool,
}

/// Reference path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Ask git for the remote url to build `owner/repo/dir@VERSION`
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Text after the `@`
    #[serde(default = "default_version_placeholder")]
    pub version_placeholder: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version_placeholder: default_version_placeholder(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_version_placeholder() -> String {
    DEFAULT_VERSION_PLACEHOLDER.to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Default config file location, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// A missing or empty file yields the defaults. Invalid YAML is an error
    /// naming the line and column.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        tracing::info!("Using config file: {}", path.display());
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables:
    /// - GHA_DOCS_ACTION_FILE
    /// - GHA_DOCS_OUTPUT_FILE
    /// - GHA_DOCS_DRY_RUN
    /// - GHA_DOCS_RENDER_PLACEHOLDER
    /// - GHA_DOCS_RENDER_TEMPLATE
    /// - GHA_DOCS_RENDER_USAGE_ONLY
    /// - GHA_DOCS_REFERENCE_ENABLED
    /// - GHA_DOCS_REFERENCE_VERSION_PLACEHOLDER
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(action_file) = std::env::var("GHA_DOCS_ACTION_FILE") {
            self.action_file = PathBuf::from(action_file);
        }
        if let Ok(output_file) = std::env::var("GHA_DOCS_OUTPUT_FILE") {
            self.output_file = Some(PathBuf::from(output_file));
        }
        if let Some(dry_run) = env_bool("GHA_DOCS_DRY_RUN") {
            self.dry_run = dry_run;
        }

        if let Ok(placeholder) = std::env::var("GHA_DOCS_RENDER_PLACEHOLDER") {
            match placeholder.to_lowercase().as_str() {
                "expression" => self.render.placeholder = PlaceholderStyle::Expression,
                "literal" => self.render.placeholder = PlaceholderStyle::Literal,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(template) = std::env::var("GHA_DOCS_RENDER_TEMPLATE") {
            self.render.template = Some(PathBuf::from(template));
        }
        if let Some(usage_only) = env_bool("GHA_DOCS_RENDER_USAGE_ONLY") {
            self.render.usage_only = usage_only;
        }

        if let Some(enabled) = env_bool("GHA_DOCS_REFERENCE_ENABLED") {
            self.reference.enabled = enabled;
        }
        if let Ok(version) = std::env::var("GHA_DOCS_REFERENCE_VERSION_PLACEHOLDER") {
            self.reference.version_placeholder = version;
        }
    }

    /// Path the rendered docs are written to
    pub fn output_path(&self) -> PathBuf {
        match &self.output_file {
            Some(path) => path.clone(),
            None => self
                .action_file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_OUTPUT_FILE_NAME),
        }
    }
}

/// Read a boolean env var; unparseable values are ignored
fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Format YAML parsing error with location and context
pub(crate) fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for every test that touches GHA_DOCS_* variables.
#[cfg(test)]
pub(crate) static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) const ENV_KEYS: &[&str] = &[
    "GHA_DOCS_ACTION_FILE",
    "GHA_DOCS_OUTPUT_FILE",
    "GHA_DOCS_DRY_RUN",
    "GHA_DOCS_RENDER_PLACEHOLDER",
    "GHA_DOCS_RENDER_TEMPLATE",
    "GHA_DOCS_RENDER_USAGE_ONLY",
    "GHA_DOCS_REFERENCE_ENABLED",
    "GHA_DOCS_REFERENCE_VERSION_PLACEHOLDER",
];

/// Take the env mutex and clear every GHA_DOCS_* variable
#[cfg(test)]
pub(crate) fn lock_clean_env() -> std::sync::MutexGuard<'static, ()> {
    let guard = CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
    guard
}
