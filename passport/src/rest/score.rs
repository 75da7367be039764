use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{PassportError, Result};
use crate::types::ScoreEnvelope;

/// Client for the external wallet score service.
///
/// Lookups never fail: any transport error, non-2xx status, malformed body or
/// missing score resolves to `None`.
#[derive(Debug, Clone)]
pub struct ScoreClient {
    client: Client,
    url: String,
    timeout: Option<Duration>,
}

impl ScoreClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            timeout: config.request_timeout,
            ..Self::new(&config.score_url)
        }
    }

    /// GET `{url}/{address}` and return `data.totalScore`.
    pub async fn fetch_score(&self, address: &str) -> Option<f64> {
        match self.try_fetch(address).await {
            Ok(score) => score,
            Err(e) => {
                debug!(address, error = %e, "score lookup unavailable");
                None
            }
        }
    }

    async fn try_fetch(&self, address: &str) -> Result<Option<f64>> {
        let url = self.lookup_url(address)?;
        let mut req = self.client.get(url);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(PassportError::RequestFailed { status, message });
        }

        let envelope: ScoreEnvelope = resp.json().await?;
        Ok(envelope.total_score())
    }

    fn lookup_url(&self, address: &str) -> Result<Url> {
        if address.is_empty() {
            return Err(PassportError::Validation("empty wallet address".into()));
        }
        let mut url = Url::parse(&self.url)
            .map_err(|e| PassportError::Validation(format!("score url {:?}: {e}", self.url)))?;
        url.path_segments_mut()
            .map_err(|_| PassportError::Validation(format!("score url {:?} cannot be a base", self.url)))?
            .push(address);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_appends_address() {
        let c = ScoreClient::new("https://scores.example.com/api/wallet/");
        assert_eq!(
            c.lookup_url("0xabc").unwrap().as_str(),
            "https://scores.example.com/api/wallet/0xabc"
        );
    }

    #[test]
    fn test_lookup_url_escapes_address() {
        let c = ScoreClient::new("https://scores.example.com/wallet");
        assert_eq!(
            c.lookup_url("a/b c").unwrap().as_str(),
            "https://scores.example.com/wallet/a%2Fb%20c"
        );
    }

    #[test]
    fn test_lookup_url_rejects_empty_address() {
        let c = ScoreClient::new("https://scores.example.com/wallet");
        assert!(c.lookup_url("").is_err());
    }
}
