//! The explanation backend

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::response::{ExplainRequest, ExplainResponse};

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ExplainError {
    #[error("request failed: {0}")]
    #[diagnostic(
        code(storyviz::explain::transport),
        help("check that the explanation service is running and STORYVIZ_API_URL points at it")
    )]
    Transport(String),

    #[error("server returned status {0}")]
    #[diagnostic(code(storyviz::explain::status))]
    Status(u16),

    #[error("malformed response: {0}")]
    #[diagnostic(
        code(storyviz::explain::malformed),
        help("expected a JSON object with a `response` array")
    )]
    Malformed(String),
}

/// Something that answers questions. Blocking; callers run it off the
/// async executor.
pub trait ExplainBackend: Send + Sync {
    fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ExplainError>;
}

/// `POST {base}/api/explain` over HTTP
pub struct HttpBackend {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            endpoint: format!("{}/api/explain", config.endpoint.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ExplainBackend for HttpBackend {
    fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ExplainError> {
        let body =
            serde_json::to_string(request).map_err(|e| ExplainError::Transport(e.to_string()))?;
        debug!(endpoint = %self.endpoint, "posting question");

        let mut resp = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => ExplainError::Status(code),
                other => ExplainError::Transport(other.to_string()),
            })?;

        let text = resp
            .body_mut()
            .read_to_string()
            .map_err(|e| ExplainError::Transport(e.to_string()))?;
        let parsed = ExplainResponse::parse(&text)?;
        info!(parts = parsed.response.len(), "answer received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_once() {
        let backend = HttpBackend::new(&ClientConfig {
            endpoint: "http://localhost:3000/".into(),
            ..Default::default()
        });
        assert_eq!(backend.endpoint(), "http://localhost:3000/api/explain");
    }
}
