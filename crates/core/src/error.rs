//! Error types for the chroma-tokens core.

use thiserror::Error;

/// Errors produced by token construction, parsing, and theme documents.
///
/// Numeric values outside their documented ranges are never errors: they are
/// clamped or wrapped and reported through `tracing` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThemeError {
    /// The input could not be interpreted as the claimed color representation.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A theme document (JSON or CSS) was structurally unusable.
    #[error("invalid theme document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for ThemeError {
    fn from(e: serde_json::Error) -> Self {
        ThemeError::InvalidDocument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_includes_message() {
        let err = ThemeError::MalformedInput("expected 6 hex digits, got 4".into());
        let msg = format!("{err}");
        assert!(msg.contains("malformed"), "missing kind in: {msg}");
        assert!(msg.contains("6 hex digits"), "missing detail in: {msg}");
    }

    #[test]
    fn invalid_document_includes_message() {
        let err = ThemeError::InvalidDocument("missing light variant".into());
        let msg = format!("{err}");
        assert!(msg.contains("missing light variant"), "missing detail in: {msg}");
    }

    #[test]
    fn serde_json_error_routes_to_invalid_document() {
        let bad = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ThemeError::from(bad);
        assert!(matches!(err, ThemeError::InvalidDocument(_)));
    }

    #[test]
    fn theme_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThemeError>();
    }

    #[test]
    fn theme_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<ThemeError>();
    }
}
