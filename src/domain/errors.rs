//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types; parser
//! errors from the format libraries are flattened to strings that keep the
//! underlying position information (line/column or byte offset).

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the application.
/// Parse and configuration errors abort a run before any output is written.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Malformed input document for the selected format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid or unknown rule, strategy, or option
    #[error("Configuration error: {0}")]
    Config(String),

    /// A masking strategy could not produce a replacement value
    #[error("Masking error: {0}")]
    Masking(#[from] MaskingError),

    /// Failure while serializing the anonymized tree back out
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Per-field masking failures
///
/// Non-fatal by default: the engine records the field in the masking report
/// and falls back to the fixed redaction token. With `on_error = "fail"`
/// they abort the run instead.
#[derive(Debug, Error)]
pub enum MaskingError {
    /// The strategy's output type is incompatible with the original value
    #[error("{strategy} cannot replace {actual} value at '{path}' without coercion")]
    TypeMismatch {
        strategy: &'static str,
        actual: String,
        path: String,
    },

    /// The generator kept producing the original value
    #[error("could not generate a replacement distinct from the original at '{path}'")]
    NonIdentity { path: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// serde_json reports line and column in its Display output
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Parse(format!("invalid JSON: {err}"))
    }
}

// csv reports record and line positions in its Display output
impl From<csv::Error> for VeilError {
    fn from(err: csv::Error) -> Self {
        VeilError::Parse(format!("invalid CSV: {err}"))
    }
}

impl From<quick_xml::Error> for VeilError {
    fn from(err: quick_xml::Error) -> Self {
        VeilError::Parse(format!("invalid XML: {err}"))
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Config(format!("TOML parse error: {err}"))
    }
}
