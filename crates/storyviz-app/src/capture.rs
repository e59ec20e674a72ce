//! Interpreting what a code run printed.
//!
//! Code that wants to show a picture prints `VISUAL:` followed by base64 PNG
//! data as its entire (trimmed) stdout.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::interpreter::{InterpreterError, RawOutput};

pub const VISUAL_MARKER: &str = "VISUAL:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutput {
    pub png: Vec<u8>,
    encoded: String,
}

impl ImageOutput {
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.encoded)
    }
}

/// The result shown under a code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutput {
    Image(ImageOutput),
    Error(String),
    /// Printed text; may be empty
    Text(String),
}

impl CodeOutput {
    pub fn from_raw(raw: &RawOutput) -> Self {
        let stdout = raw.stdout.trim();
        if let Some(data) = stdout.strip_prefix(VISUAL_MARKER) {
            let encoded = data.trim();
            return match STANDARD.decode(encoded) {
                Ok(png) => CodeOutput::Image(ImageOutput {
                    png,
                    encoded: encoded.to_string(),
                }),
                Err(e) => CodeOutput::Error(InterpreterError::BadImage(e.to_string()).to_string()),
            };
        }
        if !raw.stderr.trim().is_empty() {
            return CodeOutput::Error(raw.stderr.trim_end().to_string());
        }
        CodeOutput::Text(raw.stdout.clone())
    }
}
