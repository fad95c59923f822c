//! Theme export to CSS custom properties, a Tailwind config, and JSON.
//!
//! Output is byte-for-byte deterministic for a given theme and options:
//! tokens and attributes appear in insertion order and every number is
//! formatted with fixed precision by the codec. Nothing here validates
//! tokens; a `ColorToken` is consistent by construction.

use crate::error::ThemeError;
use crate::names::css_property;
use crate::theme::Theme;
use crate::tokens::TokenSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

/// Formatting knobs shared by every exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Selector for the light variant block.
    pub light_selector: String,
    /// Selector for the dark variant block.
    pub dark_selector: String,
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            light_selector: ":root".to_string(),
            dark_selector: ".dark".to_string(),
            indent: 2,
        }
    }
}

impl ExportOptions {
    fn pad(&self, level: usize) -> String {
        " ".repeat(self.indent * level)
    }
}

/// All three export artifacts for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub css: String,
    pub config: String,
    pub json: String,
}

/// Renders every artifact.
pub fn export_all(theme: &Theme, options: &ExportOptions) -> Result<ExportBundle, ThemeError> {
    Ok(ExportBundle {
        css: to_css(theme, options),
        config: to_tailwind_config(theme, options),
        json: to_json(theme, options)?,
    })
}

/// CSS custom properties: one block for the light selector, one for the
/// dark selector (omitted when the dark variant is empty).
///
/// Colors are emitted as their `oklch(...)` display strings; attributes
/// follow the light colors verbatim.
pub fn to_css(theme: &Theme, options: &ExportOptions) -> String {
    let pad = options.pad(1);
    let mut out = String::new();

    let _ = writeln!(out, "{} {{", options.light_selector);
    write_color_properties(&mut out, &theme.light, &pad);
    for (property, value) in theme.attributes.iter() {
        let _ = writeln!(out, "{pad}--{property}: {value};");
    }
    out.push_str("}\n");

    if !theme.dark.is_empty() {
        let _ = writeln!(out, "\n{} {{", options.dark_selector);
        write_color_properties(&mut out, &theme.dark, &pad);
        out.push_str("}\n");
    }

    debug!(
        light = theme.light.len(),
        dark = theme.dark.len(),
        attributes = theme.attributes.len(),
        bytes = out.len(),
        "exported css"
    );
    out
}

fn write_color_properties(out: &mut String, tokens: &TokenSet, pad: &str) {
    for token in tokens {
        let _ = writeln!(
            out,
            "{pad}--{}: {};",
            css_property(token.name()),
            token.oklch_display()
        );
    }
}

/// A minimal Tailwind config mapping each token name to its hex value.
///
/// Light colors sit directly under `colors`; dark colors are grouped under
/// a nested `dark` key.
pub fn to_tailwind_config(theme: &Theme, options: &ExportOptions) -> String {
    let mut out = String::new();
    out.push_str("/** @type {import('tailwindcss').Config} */\n");
    out.push_str("module.exports = {\n");
    let _ = writeln!(out, "{}darkMode: [\"class\"],", options.pad(1));
    let _ = writeln!(out, "{}theme: {{", options.pad(1));
    let _ = writeln!(out, "{}extend: {{", options.pad(2));
    let _ = writeln!(out, "{}colors: {{", options.pad(3));

    let mut entries: Vec<String> = theme
        .light
        .iter()
        .map(|token| hex_entry(token.name(), token.hex(), &options.pad(4)))
        .collect();
    if !theme.dark.is_empty() {
        let mut dark = format!("{}\"dark\": {{\n", options.pad(4));
        let dark_entries: Vec<String> = theme
            .dark
            .iter()
            .map(|token| hex_entry(token.name(), token.hex(), &options.pad(5)))
            .collect();
        dark.push_str(&dark_entries.join(",\n"));
        let _ = write!(dark, "\n{}}}", options.pad(4));
        entries.push(dark);
    }
    out.push_str(&entries.join(",\n"));
    if !entries.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "{}}}", options.pad(3));
    let _ = writeln!(out, "{}}}", options.pad(2));
    let _ = writeln!(out, "{}}}", options.pad(1));
    out.push_str("};\n");

    debug!(
        light = theme.light.len(),
        dark = theme.dark.len(),
        bytes = out.len(),
        "exported tailwind config"
    );
    out
}

fn hex_entry(name: &str, hex: &str, pad: &str) -> String {
    format!("{pad}{}: {}", js_string(name), js_string(hex))
}

/// Quotes a string as a JSON (and therefore JavaScript) string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Pretty-printed JSON of the whole theme, with every token representation.
pub fn to_json(theme: &Theme, options: &ExportOptions) -> Result<String, ThemeError> {
    let indent = " ".repeat(options.indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    theme.serialize(&mut serializer)?;
    buf.push(b'\n');
    let out = String::from_utf8(buf).map_err(|e| ThemeError::InvalidDocument(e.to_string()))?;
    debug!(bytes = out.len(), "exported json");
    Ok(out)
}
