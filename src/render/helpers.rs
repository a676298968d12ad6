//! Markdown formatting helpers exposed to templates
//!
//! Each helper is a plain function plus a thin Tera adapter, so templates
//! and Rust callers produce identical text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tera::Value;

use crate::manifest::{InputSpec, OutputSpec};

/// Shown in place of values the reader has to fill in
pub const CHANGEME: &str = "<CHANGEME>";

/// What the usage snippet shows for an input without a default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `${{ example.INPUT_NAME }}`
    #[default]
    Expression,
    /// `<CHANGEME>`
    Literal,
}

impl PlaceholderStyle {
    pub fn placeholder(self, input_name: &str) -> String {
        match self {
            PlaceholderStyle::Expression => {
                format!("${{{{ example.{} }}}}", input_name.to_uppercase())
            }
            PlaceholderStyle::Literal => CHANGEME.to_string(),
        }
    }
}

/// Make text safe for a single markdown table cell
fn table_cell(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("<br>")
        .replace('|', "\\|")
}

/// Inputs as a markdown table: Name, Type, Default, Description, Required
pub fn input_table(inputs: &IndexMap<String, InputSpec>) -> String {
    let mut out = String::from("| Name | Type | Default | Description | Required |\n");
    out.push_str("| --- | --- | --- | --- | --- |\n");
    for (name, input) in inputs {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            table_cell(name),
            table_cell(&input.input_type),
            table_cell(&input.default_value),
            table_cell(&input.description),
            input.required
        ));
    }
    out
}

/// Outputs as a markdown table: Name, Description
pub fn output_table(outputs: &IndexMap<String, OutputSpec>) -> String {
    let mut out = String::from("| Name | Description |\n");
    out.push_str("| --- | --- |\n");
    for (name, output) in outputs {
        out.push_str(&format!(
            "| {} | {} |\n",
            table_cell(name),
            table_cell(&output.description)
        ));
    }
    out
}

/// Workflow step invoking the action, one `with:` line per input.
///
/// Inputs without a default get a placeholder. A missing reference shows
/// as `<CHANGEME>`.
pub fn usage_snippet(
    name: &str,
    uses: Option<&str>,
    inputs: &IndexMap<String, InputSpec>,
    style: PlaceholderStyle,
) -> String {
    let mut out = format!("- name: {}\n", name);
    out.push_str(&format!("  uses: {}\n", uses.unwrap_or(CHANGEME)));
    if inputs.is_empty() {
        return out;
    }

    out.push_str("  with:\n");
    for (input_name, input) in inputs {
        let value = if input.has_default() {
            input.default_value.clone()
        } else {
            style.placeholder(input_name)
        };
        out.push_str(&format!("    {}: {}\n", input_name, value));
    }
    out
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value, helper: &str, what: &str) -> tera::Result<T> {
    tera::from_value(value.clone())
        .map_err(|e| tera::Error::msg(format!("{} expects {}: {}", helper, what, e)))
}

/// `{{ inputs | input_table }}`
pub(crate) fn input_table_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let inputs: IndexMap<String, InputSpec> = decode(value, "input_table", "a map of inputs")?;
    Ok(Value::String(input_table(&inputs)))
}

/// `{{ outputs | output_table }}`
pub(crate) fn output_table_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let outputs: IndexMap<String, OutputSpec> = decode(value, "output_table", "a map of outputs")?;
    Ok(Value::String(output_table(&outputs)))
}

/// `{{ usage_snippet(name=name, uses=reference, inputs=inputs) }}`
pub(crate) fn usage_snippet_function(
    style: PlaceholderStyle,
) -> impl Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |args: &HashMap<String, Value>| {
        let name = match args.get("name") {
            Some(Value::String(name)) => name.as_str(),
            Some(other) => return Err(tera::Error::msg(format!("usage_snippet: `name` must be a string, got {}", other))),
            None => return Err(tera::Error::msg("usage_snippet: missing `name` argument")),
        };
        let uses = match args.get("uses") {
            Some(Value::String(uses)) => Some(uses.as_str()),
            Some(Value::Null) | None => None,
            Some(other) => return Err(tera::Error::msg(format!("usage_snippet: `uses` must be a string, got {}", other))),
        };
        let inputs: IndexMap<String, InputSpec> = match args.get("inputs") {
            Some(value) => decode(value, "usage_snippet", "a map of inputs")?,
            None => IndexMap::new(),
        };

        Ok(Value::String(usage_snippet(name, uses, &inputs, style)))
    }
}
