//! Documentation renderer
//!
//! Renders a [`Manifest`] through a Tera template. The built-in template
//! (`templates/doc.md`) is compiled into the binary; a custom template can be
//! supplied as a string or a file. Templates see the manifest fields
//! (`name`, `description`, `inputs`, `outputs`, `reference`) and three
//! helpers:
//! - `input_table` filter
//! - `output_table` filter
//! - `usage_snippet(name, uses, inputs)` function

use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::manifest::Manifest;

mod error;
mod helpers;

pub use error::RenderError;
pub use helpers::{input_table, output_table, usage_snippet, PlaceholderStyle, CHANGEME};

/// The built-in document template
pub const EMBEDDED_TEMPLATE: &str = include_str!("../../templates/doc.md");

/// Name the template is registered under. The `.md` suffix keeps Tera's
/// HTML autoescaping off.
const TEMPLATE_NAME: &str = "doc.md";

/// Renders manifests through a single template
pub struct DocRenderer {
    tera: Tera,
    placeholder: PlaceholderStyle,
}

impl DocRenderer {
    /// Renderer over the built-in template
    pub fn embedded(placeholder: PlaceholderStyle) -> Result<Self, RenderError> {
        Self::from_template(EMBEDDED_TEMPLATE, placeholder)
    }

    /// Renderer over a template file
    pub fn from_file(path: &Path, placeholder: PlaceholderStyle) -> Result<Self, RenderError> {
        let source = fs::read_to_string(path).map_err(|e| RenderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!("Using template {}", path.display());
        Self::from_template(&source, placeholder)
    }

    /// Renderer over an inline template
    pub fn from_template(source: &str, placeholder: PlaceholderStyle) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.register_filter("input_table", helpers::input_table_filter);
        tera.register_filter("output_table", helpers::output_table_filter);
        tera.register_function("usage_snippet", helpers::usage_snippet_function(placeholder));

        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| RenderError::Template(error_chain("Failed to parse template", &e)))?;

        Ok(Self { tera, placeholder })
    }

    /// Render the full document
    pub fn render(&self, manifest: &Manifest) -> Result<String, RenderError> {
        let context = TeraContext::from_serialize(manifest)
            .map_err(|e| RenderError::Template(error_chain("Failed to build template context", &e)))?;

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| RenderError::Template(error_chain("Failed to render template", &e)))
    }

    /// Render only the usage snippet
    pub fn render_usage(&self, manifest: &Manifest) -> String {
        usage_snippet(
            &manifest.name,
            manifest.reference.as_deref(),
            &manifest.inputs,
            self.placeholder,
        )
    }

    pub fn placeholder(&self) -> PlaceholderStyle {
        self.placeholder
    }
}

/// Flatten a Tera error and its causes into one message
fn error_chain(context: &str, e: &tera::Error) -> String {
    let mut error_msg = format!("{}: {}", context, e);
    let mut source = e.source();
    while let Some(s) = source {
        error_msg.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    error_msg
}

/// Write rendered docs to `path`
pub fn write_docs(path: &Path, data: &[u8]) -> Result<(), RenderError> {
    fs::write(path, data).map_err(|e| RenderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}
