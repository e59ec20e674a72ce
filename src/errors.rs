//! Error types with diagnostics using miette
//!
//! The renderer itself never fails on bad diagram data (that degrades to a
//! placeholder scene), so these only cover the edges: reading a diagram
//! config and serializing a finished scene.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Config Errors
// ============================================================================

/// Errors that occur while reading a diagram configuration
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("diagram config is not valid JSON: {message}")]
    #[diagnostic(code(storyviz::config::invalid_json))]
    InvalidJson { message: String },

    #[error("diagram config must be a JSON object, got {got}")]
    #[diagnostic(
        code(storyviz::config::not_an_object),
        help("expected an object with a `type` string and an optional `params` object")
    )]
    NotAnObject { got: &'static str },

    #[error("diagram config has no `type`")]
    #[diagnostic(code(storyviz::config::missing_type))]
    MissingType,

    #[error("diagram `params` must be an object, got {got}")]
    #[diagnostic(code(storyviz::config::params_not_an_object))]
    ParamsNotAnObject { got: &'static str },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur while turning a scene into SVG
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("invalid viewport: {width}x{height}")]
    #[diagnostic(
        code(storyviz::render::invalid_viewport),
        help("viewport dimensions must be finite and positive")
    )]
    InvalidViewport { width: f64, height: f64 },

    #[error("SVG serialization failed: {message}")]
    #[diagnostic(code(storyviz::render::serialize))]
    Serialize { message: String },
}

/// Name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
