//! Runtime settings, read from the environment

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_PYTHON: &str = "python3";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL; requests go to `{endpoint}/api/explain`
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// `STORYVIZ_API_URL` and `STORYVIZ_TIMEOUT_SECS`; unset or unparsable
    /// values keep the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = get("STORYVIZ_API_URL").filter(|s| !s.trim().is_empty()) {
            config.endpoint = url.trim().to_string();
        }
        if let Some(secs) = get("STORYVIZ_TIMEOUT_SECS").and_then(|s| s.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterConfig {
    pub program: PathBuf,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PYTHON),
        }
    }
}

impl InterpreterConfig {
    /// `STORYVIZ_PYTHON`
    pub fn from_env() -> Self {
        std::env::var_os("STORYVIZ_PYTHON")
            .filter(|s| !s.is_empty())
            .map(|program| Self {
                program: program.into(),
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("STORYVIZ_API_URL", "https://explain.example"),
            ("STORYVIZ_TIMEOUT_SECS", "5"),
        ]
        .into();
        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.endpoint, "https://explain.example");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = ClientConfig::from_lookup(|k| {
            (k == "STORYVIZ_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config, ClientConfig::default());
    }
}
