use std::time::Duration;

use url::Url;

use crate::error::{PassportError, Result};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
/// Default score service URL; the wallet address is appended as a path segment.
pub const DEFAULT_SCORE_URL: &str = "http://localhost:8080/api/v1/score";

/// Configuration for the passport clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the API paths are appended to (e.g. `http://localhost:8080/api/v1`).
    pub api_base_url: String,
    /// Score lookup endpoint.
    pub score_url: String,
    /// Per-request deadline; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            score_url: DEFAULT_SCORE_URL.into(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read `PASSPORT_API_URL`, `PASSPORT_SCORE_URL` and `PASSPORT_TIMEOUT_MS`,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup("PASSPORT_API_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = lookup("PASSPORT_SCORE_URL") {
            config.score_url = url;
        }
        if let Some(ms) = lookup("PASSPORT_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                PassportError::Validation(format!("PASSPORT_TIMEOUT_MS is not a number: {ms:?}"))
            })?;
            config.request_timeout = Some(Duration::from_millis(ms));
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that both URLs parse as absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("api_base_url", &self.api_base_url), ("score_url", &self.score_url)] {
            let url = Url::parse(value)
                .map_err(|e| PassportError::Validation(format!("{name} {value:?}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(PassportError::Validation(format!(
                    "{name} must be http or https: {value:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("PASSPORT_API_URL", "https://api.example.com/v2"),
            ("PASSPORT_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v2");
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[("PASSPORT_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, PassportError::Validation(_)));
    }

    #[test]
    fn test_bad_url() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("PASSPORT_API_URL", "not a url")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("PASSPORT_SCORE_URL", "ftp://x/y")])).is_err());
    }
}
