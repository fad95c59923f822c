//! CLI errors, each tied to the file or argument that caused it.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: theme file unusable (bad JSON document or stylesheet)
//! - 11: theme or output file could not be read or written
//! - 12: bad color argument or bad `--options` file
//! - 13: output could not be rendered

use chroma_tokens_core::ThemeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Theme { path: PathBuf, source: ThemeError },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {role} color {text:?}: {source}")]
    Color {
        role: String,
        text: String,
        source: ThemeError,
    },

    #[error("invalid --options file {}: {source}", path.display())]
    Options {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("rendering output: {0}")]
    Render(#[from] ThemeError),

    #[error("serializing output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Theme { .. } => 10,
            CliError::Io { .. } => 11,
            CliError::Color { .. } | CliError::Options { .. } => 12,
            CliError::Render(_) | CliError::Serialization(_) => 13,
        }
    }
}
