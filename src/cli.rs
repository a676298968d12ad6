//! Command line surface
//!
//! Flags sit on top of the config file and environment (see [`crate::config`]).

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;
use crate::manifest::ManifestLoader;
use crate::render::{write_docs, DocRenderer, PlaceholderStyle};

/// gha-docs - render README docs from a GitHub Action manifest
#[derive(Parser, Debug, Default)]
#[command(name = "gha-docs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.gha-docs.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub action file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub action_file: Option<PathBuf>,

    /// Markdown file the rendered documentation is written to
    /// (default: README.md next to the action file)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Render the markdown docs and print to stdout
    #[arg(long)]
    pub dry_run: bool,

    /// Render only the usage snippet
    #[arg(long)]
    pub usage_only: bool,

    /// Tera template to render instead of the built-in one
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Placeholder for inputs without a default
    #[arg(long, value_enum)]
    pub placeholder: Option<PlaceholderStyle>,

    /// Version shown after `@` in the derived reference
    #[arg(long, value_name = "TEXT")]
    pub version_placeholder: Option<String>,

    /// Don't ask git for the repository; reference is left unset
    #[arg(long)]
    pub no_reference: bool,
}

impl Cli {
    /// Config file to read: `--config`, else the one in the home directory
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }

    /// Defaults, config file, and environment, then these flags on top
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match self.config_path() {
            Some(path) => Config::load_with_env(&path)?,
            None => {
                tracing::debug!("No home directory; skipping config file");
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Override config values with the flags that were given
    pub fn apply(&self, config: &mut Config) {
        if let Some(action_file) = &self.action_file {
            config.action_file = action_file.clone();
        }
        if let Some(output_file) = &self.output_file {
            config.output_file = Some(output_file.clone());
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.usage_only {
            config.render.usage_only = true;
        }
        if let Some(template) = &self.template {
            config.render.template = Some(template.clone());
        }
        if let Some(placeholder) = self.placeholder {
            config.render.placeholder = placeholder;
        }
        if let Some(version) = &self.version_placeholder {
            config.reference.version_placeholder = version.clone();
        }
        if self.no_reference {
            config.reference.enabled = false;
        }
    }
}

/// Manifest loader honoring the reference settings
pub fn loader_for(config: &Config) -> ManifestLoader {
    ManifestLoader::new()
        .with_reference(config.reference.enabled)
        .with_version_placeholder(config.reference.version_placeholder.clone())
}

/// Load, render, and write (or print) the docs described by `config`
pub fn run(config: &Config, stdout: &mut dyn Write) -> Result<()> {
    run_with_loader(config, &loader_for(config), stdout)
}

/// [`run`] with an explicit loader
pub fn run_with_loader(config: &Config, loader: &ManifestLoader, stdout: &mut dyn Write) -> Result<()> {
    let manifest = loader.load(&config.action_file)?;

    let placeholder = config.render.placeholder;
    let renderer = match &config.render.template {
        Some(path) => DocRenderer::from_file(path, placeholder)?,
        None => DocRenderer::embedded(placeholder)?,
    };

    let doc = if config.render.usage_only {
        renderer.render_usage(&manifest)
    } else {
        renderer.render(&manifest)?
    };

    if config.dry_run {
        stdout
            .write_all(doc.as_bytes())
            .context("Failed to write docs to stdout")?;
        return Ok(());
    }

    write_docs(&config.output_path(), doc.as_bytes())?;
    Ok(())
}
