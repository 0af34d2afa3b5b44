use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};

use crate::config::DashboardConfig;
use crate::error::{ConfigError, FetchError};
use crate::source::MarketDataSource;

pub const USER_AGENT: &str = "CryptoWatch-Dashboard/1.0";

/// HTTP transport for the controller.
///
/// With a proxy configured every request goes to `<proxy>/api/crypto?endpoint=...`
/// first and falls back to the provider once if the proxy fails. Without one the
/// provider is called directly.
pub struct HttpMarketSource {
    client: Client,
    proxy_base_url: Option<String>,
    provider_base_url: String,
}

impl HttpMarketSource {
    pub fn new(config: &DashboardConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        match &config.proxy_base_url {
            Some(proxy) => info!("Requesting market data through proxy {}", proxy),
            None => info!("PROXY_BASE_URL not set, calling the market data provider directly"),
        }

        Ok(Self::with_client(
            client,
            config.proxy_base_url.clone(),
            config.provider_base_url.clone(),
        ))
    }

    pub fn with_client(client: Client, proxy_base_url: Option<String>, provider_base_url: String) -> Self {
        HttpMarketSource {
            client,
            proxy_base_url,
            provider_base_url,
        }
    }

    pub fn proxy_url(&self) -> Option<String> {
        self.proxy_base_url
            .as_ref()
            .map(|base| format!("{}/api/crypto", base.trim_end_matches('/')))
    }

    pub fn provider_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.provider_base_url.trim_end_matches('/'), endpoint)
    }

    async fn fetch_via_proxy(&self, proxy_url: &str, endpoint: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Requesting {} through proxy {}", endpoint, proxy_url);
        let response = self
            .client
            .get(proxy_url)
            .query(&[("endpoint", endpoint)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_success(response).await
    }

    async fn fetch_direct(&self, endpoint: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.provider_url(endpoint);
        debug!("Requesting {} from provider", url);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_success(response).await
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketSource {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>, FetchError> {
        match self.proxy_url() {
            Some(proxy_url) => match self.fetch_via_proxy(&proxy_url, endpoint).await {
                Ok(body) => Ok(body),
                Err(e) => {
                    warn!("Proxy request for {} failed ({}), calling provider directly", endpoint, e);
                    self.fetch_direct(endpoint).await
                }
            },
            None => self.fetch_direct(endpoint).await,
        }
    }
}

async fn read_success(response: Response) -> Result<Vec<u8>, FetchError> {
    let status = response.status();
    if !status.is_success() {
        if status.as_u16() == 429 {
            warn!("Market data provider rate limit reached");
        }
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}
