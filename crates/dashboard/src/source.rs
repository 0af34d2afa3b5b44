// Market data source seam and typed CoinGecko fetch helpers

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{
    chart_points, ranked_assets, ChartPoint, GlobalResponse, GlobalStats, HeadlineMetric,
    MarketChartResponse, MarketCoin, RankedAsset, SimplePriceResponse, TRACKED_ASSETS,
};

use crate::error::FetchError;

/// Size of the ranked listing requested on every refresh.
pub const RANKING_PAGE_SIZE: u32 = 20;

/// Raw transport seam. The typed `fetch_*` helpers below validate bodies
/// against the schemas in `shared::provider`.
#[async_trait]
pub trait MarketDataSource: Send + Sync + 'static {
    /// Fetches `endpoint` (e.g. `global`, `coins/bitcoin/market_chart?...`) and
    /// returns the raw JSON body of a successful response.
    async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>, FetchError>;
}

pub fn global_endpoint() -> String {
    "global".to_string()
}

pub fn simple_price_endpoint(ids: &[&str]) -> String {
    format!(
        "simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&include_24hr_vol=true&include_market_cap=true",
        ids.join(",")
    )
}

pub fn market_chart_endpoint(asset_id: &str, days: u32) -> String {
    format!("coins/{}/market_chart?vs_currency=usd&days={}", asset_id, days)
}

pub fn markets_endpoint(per_page: u32) -> String {
    format!(
        "coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h",
        per_page
    )
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn fetch_global<S: MarketDataSource + ?Sized>(source: &S) -> Result<GlobalStats, FetchError> {
    let body = source.fetch(&global_endpoint()).await?;
    let response: GlobalResponse = decode(&body)?;
    Ok(GlobalStats::from(response.data))
}

/// Headline cards for the tracked basket, in basket order.
pub async fn fetch_headline_metrics<S: MarketDataSource + ?Sized>(
    source: &S,
) -> Result<Vec<HeadlineMetric>, FetchError> {
    let ids: Vec<&str> = TRACKED_ASSETS.iter().map(|asset| asset.id).collect();
    let body = source.fetch(&simple_price_endpoint(&ids)).await?;
    let prices: SimplePriceResponse = decode(&body)?;

    TRACKED_ASSETS
        .iter()
        .map(|asset| {
            prices
                .get(asset.id)
                .map(|quote| HeadlineMetric::from_quote(asset, quote))
                .ok_or_else(|| FetchError::Shape(asset.id.to_string()))
        })
        .collect()
}

pub async fn fetch_chart<S: MarketDataSource + ?Sized>(
    source: &S,
    asset_id: &str,
    days: u32,
) -> Result<Vec<ChartPoint>, FetchError> {
    if days == 0 {
        return Err(FetchError::InvalidRange(days));
    }
    let body = source.fetch(&market_chart_endpoint(asset_id, days)).await?;
    let chart: MarketChartResponse = decode(&body)?;
    Ok(chart_points(&chart))
}

pub async fn fetch_ranking<S: MarketDataSource + ?Sized>(
    source: &S,
    per_page: u32,
) -> Result<Vec<RankedAsset>, FetchError> {
    let body = source.fetch(&markets_endpoint(per_page)).await?;
    let coins: Vec<MarketCoin> = decode(&body)?;
    Ok(ranked_assets(coins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixtureSource {
        bodies: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FixtureSource {
        fn new(entries: &[(String, &str)]) -> Self {
            FixtureSource {
                bodies: entries.iter().map(|(k, v)| (k.clone(), v.to_string())).collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for FixtureSource {
        async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().unwrap().push(endpoint.to_string());
            self.bodies
                .get(endpoint)
                .map(|body| body.as_bytes().to_vec())
                .ok_or(FetchError::Status(404))
        }
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(global_endpoint(), "global");
        assert_eq!(
            simple_price_endpoint(&["bitcoin", "ethereum", "binancecoin", "solana"]),
            "simple/price?ids=bitcoin,ethereum,binancecoin,solana&vs_currencies=usd&include_24hr_change=true&include_24hr_vol=true&include_market_cap=true"
        );
        assert_eq!(
            market_chart_endpoint("solana", 30),
            "coins/solana/market_chart?vs_currency=usd&days=30"
        );
        assert_eq!(
            markets_endpoint(20),
            "coins/markets?vs_currency=usd&order=market_cap_desc&per_page=20&page=1&sparkline=false&price_change_percentage=24h"
        );
    }

    #[tokio::test]
    async fn test_fetch_global() {
        let body = r#"{"data": {"total_market_cap": {"usd": 2.5e12}, "total_volume": {"usd": 1.1e11},
            "market_cap_change_percentage_24h_usd": 0.8, "active_cryptocurrencies": 12000,
            "market_cap_percentage": {"btc": 51.5}}}"#;
        let source = FixtureSource::new(&[(global_endpoint(), body)]);

        let stats = fetch_global(&source).await.unwrap();
        assert_eq!(stats.total_market_cap, 2.5e12);
        assert_eq!(stats.active_cryptocurrencies, 12000);
    }

    #[tokio::test]
    async fn test_fetch_global_shape_mismatch_is_decode_error() {
        let source = FixtureSource::new(&[(global_endpoint(), r#"{"data": {}}"#)]);
        let err = fetch_global(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_metrics_missing_asset() {
        let ids: Vec<&str> = TRACKED_ASSETS.iter().map(|a| a.id).collect();
        let body = r#"{"bitcoin": {"usd": 1.0}, "ethereum": {"usd": 2.0}, "solana": {"usd": 3.0}}"#;
        let source = FixtureSource::new(&[(simple_price_endpoint(&ids), body)]);

        let err = fetch_headline_metrics(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::Shape(ref id) if id == "binancecoin"));
    }

    #[tokio::test]
    async fn test_fetch_metrics_in_basket_order() {
        let ids: Vec<&str> = TRACKED_ASSETS.iter().map(|a| a.id).collect();
        let body = r#"{
            "solana": {"usd": 150.0, "usd_24h_change": -2.0, "usd_24h_vol": 2e9, "usd_market_cap": 7e10},
            "bitcoin": {"usd": 67000.0, "usd_24h_change": 1.0, "usd_24h_vol": 3e10, "usd_market_cap": 1.3e12},
            "binancecoin": {"usd": 580.0, "usd_24h_change": 0.5, "usd_24h_vol": 1e9, "usd_market_cap": 8.5e10},
            "ethereum": {"usd": 3500.0, "usd_24h_change": 2.0, "usd_24h_vol": 1.5e10, "usd_market_cap": 4.2e11}
        }"#;
        let source = FixtureSource::new(&[(simple_price_endpoint(&ids), body)]);

        let metrics = fetch_headline_metrics(&source).await.unwrap();
        let titles: Vec<&str> = metrics.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Bitcoin", "Ethereum", "BNB", "Solana"]);
        assert_eq!(metrics[3].change, "-2.0%");
    }

    #[tokio::test]
    async fn test_fetch_chart_rejects_zero_days() {
        let source = FixtureSource::new(&[]);
        let err = fetch_chart(&source, "bitcoin", 0).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRange(0)));
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_chart_requests_asset_and_days() {
        let body = r#"{"prices": [[1704067200000, 100.0]], "total_volumes": [[1704067200000, 5.0]]}"#;
        let source = FixtureSource::new(&[(market_chart_endpoint("dogecoin", 1), body)]);

        let points = fetch_chart(&source, "dogecoin", 1).await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].volume, 5.0);
        assert_eq!(
            source.requested.lock().unwrap().as_slice(),
            &["coins/dogecoin/market_chart?vs_currency=usd&days=1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_ranking_propagates_status() {
        let source = FixtureSource::new(&[]);
        let err = fetch_ranking(&source, RANKING_PAGE_SIZE).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }
}
