use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::upstream::Upstream;

pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
    pub cache: Mutex<HashMap<String, (Value, SystemTime)>>,
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>, cache_ttl: Duration) -> Self {
        AppState {
            upstream,
            cache: Mutex::new(HashMap::new()),
            cache_ttl,
        }
    }

    /// Cached body for `endpoint` if it is younger than the TTL.
    pub fn cached(&self, endpoint: &str) -> Option<Value> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(endpoint).and_then(|(body, fetched_at)| {
            let age = fetched_at.elapsed().unwrap_or(Duration::MAX);
            (age < self.cache_ttl).then(|| body.clone())
        })
    }

    pub fn store(&self, endpoint: &str, body: Value) {
        if self.cache_ttl.is_zero() {
            return;
        }
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.retain(|_, (_, fetched_at)| fetched_at.elapsed().map_or(false, |age| age < self.cache_ttl));
        cache.insert(endpoint.to_string(), (body, SystemTime::now()));
    }
}

#[derive(Debug, Deserialize)]
pub struct CryptoQuery {
    pub endpoint: Option<String>,
    /// Extra query string appended to the endpoint.
    pub params: Option<String>,
}

impl CryptoQuery {
    /// The provider-relative path to forward, or `None` when `endpoint` is
    /// missing or blank.
    pub fn target(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        match self.params.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(params) => {
                let separator = if endpoint.contains('?') { '&' } else { '?' };
                Some(format!("{}{}{}", endpoint, separator, params))
            }
            None => Some(endpoint.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use async_trait::async_trait;

    struct NoUpstream;

    #[async_trait]
    impl Upstream for NoUpstream {
        async fn get(&self, _endpoint: &str) -> Result<Value, ProxyError> {
            Err(ProxyError::UpstreamStatus(503))
        }
    }

    fn query(endpoint: Option<&str>, params: Option<&str>) -> CryptoQuery {
        CryptoQuery {
            endpoint: endpoint.map(str::to_string),
            params: params.map(str::to_string),
        }
    }

    #[test]
    fn test_query_target() {
        assert_eq!(query(None, None).target(), None);
        assert_eq!(query(Some("  "), Some("days=7")).target(), None);
        assert_eq!(query(Some("global"), None).target(), Some("global".to_string()));
        assert_eq!(
            query(Some("coins/bitcoin/market_chart"), Some("vs_currency=usd&days=7")).target(),
            Some("coins/bitcoin/market_chart?vs_currency=usd&days=7".to_string())
        );
        assert_eq!(
            query(Some("simple/price?ids=bitcoin"), Some("vs_currencies=usd")).target(),
            Some("simple/price?ids=bitcoin&vs_currencies=usd".to_string())
        );
        assert_eq!(query(Some("global"), Some("")).target(), Some("global".to_string()));
    }

    #[test]
    fn test_cache_round_trip() {
        let state = AppState::new(Arc::new(NoUpstream), Duration::from_secs(30));
        assert!(state.cached("global").is_none());

        state.store("global", serde_json::json!({"data": 1}));
        assert_eq!(state.cached("global"), Some(serde_json::json!({"data": 1})));
        assert!(state.cached("coins/markets").is_none());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let state = AppState::new(Arc::new(NoUpstream), Duration::ZERO);
        state.store("global", serde_json::json!({"data": 1}));
        assert!(state.cached("global").is_none());
    }
}
