use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

use crate::error::ProxyError;

pub const PROXY_USER_AGENT: &str = "CryptoWatch-Dashboard/1.0";

/// The market data provider behind the proxy.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches `endpoint` relative to the provider root and returns its JSON body.
    async fn get(&self, endpoint: &str) -> Result<Value, ProxyError>;
}

pub struct CoinGeckoUpstream {
    client: Client,
    base_url: String,
}

impl CoinGeckoUpstream {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        CoinGeckoUpstream {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl Upstream for CoinGeckoUpstream {
    async fn get(&self, endpoint: &str) -> Result<Value, ProxyError> {
        let url = self.url_for(endpoint);
        debug!("Forwarding request to {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, PROXY_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("CoinGecko API returned status: {}", status);
            if status.as_u16() == 429 {
                warn!("Rate limit reached for {}", endpoint);
            }
            return Err(ProxyError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
