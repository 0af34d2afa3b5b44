#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use async_trait::async_trait;
use serde_json::json;
use shared::TRACKED_ASSETS;

use crypto_dashboard::source::{
    global_endpoint, market_chart_endpoint, markets_endpoint, simple_price_endpoint, RANKING_PAGE_SIZE,
};
use crypto_dashboard::{FetchError, MarketDataSource};

pub const DAY_MS: i64 = 86_400_000;
pub const START_MS: i64 = 1_704_067_200_000;

/// In-memory provider keyed by exact endpoint path.
pub struct MockProvider {
    bodies: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        MockProvider {
            bodies: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider answering all four documented endpoints for `bitcoin` over 7 days.
    pub fn with_defaults() -> Self {
        let provider = MockProvider::new();
        provider.set(global_endpoint(), global_body(2.5e12));
        provider.set(tracked_prices_endpoint(), prices_body(67_000.0));
        provider.set(market_chart_endpoint("bitcoin", 7), chart_body(7, 7));
        provider.set(markets_endpoint(RANKING_PAGE_SIZE), markets_body(&["bitcoin", "ethereum", "tether"]));
        provider
    }

    pub fn set(&self, endpoint: String, body: String) {
        self.bodies.lock().unwrap().insert(endpoint, body);
    }

    pub fn fail(&self, endpoint: String) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &str) {
        self.failing.lock().unwrap().remove(endpoint);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataSource for MockProvider {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(endpoint.to_string());
        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(FetchError::Status(500));
        }
        self.bodies
            .lock()
            .unwrap()
            .get(endpoint)
            .map(|body| body.as_bytes().to_vec())
            .ok_or(FetchError::Status(404))
    }
}

pub fn tracked_prices_endpoint() -> String {
    let ids: Vec<&str> = TRACKED_ASSETS.iter().map(|asset| asset.id).collect();
    simple_price_endpoint(&ids)
}

pub fn global_body(total_market_cap: f64) -> String {
    json!({
        "data": {
            "total_market_cap": {"usd": total_market_cap},
            "total_volume": {"usd": 9.8e10},
            "market_cap_change_percentage_24h_usd": -1.25,
            "active_cryptocurrencies": 12_345,
            "market_cap_percentage": {"btc": 53.1}
        }
    })
    .to_string()
}

pub fn prices_body(bitcoin_price: f64) -> String {
    json!({
        "bitcoin": {"usd": bitcoin_price, "usd_24h_change": 1.5, "usd_24h_vol": 3.1e10, "usd_market_cap": 1.32e12},
        "ethereum": {"usd": 3_456.78, "usd_24h_change": -0.4, "usd_24h_vol": 1.4e10, "usd_market_cap": 4.15e11},
        "binancecoin": {"usd": 590.1, "usd_24h_change": 0.0, "usd_24h_vol": 1.2e9, "usd_market_cap": 8.7e10},
        "solana": {"usd": 148.25, "usd_24h_change": 3.75, "usd_24h_vol": 2.6e9, "usd_market_cap": 6.9e10}
    })
    .to_string()
}

/// `price_count` daily prices and `volume_count` daily volumes starting at `START_MS`.
pub fn chart_body(price_count: usize, volume_count: usize) -> String {
    let prices: Vec<(i64, f64)> = (0..price_count)
        .map(|i| (START_MS + i as i64 * DAY_MS, 42_000.0 + i as f64 * 100.0))
        .collect();
    let volumes: Vec<(i64, f64)> = (0..volume_count)
        .map(|i| (START_MS + i as i64 * DAY_MS, 2.0e10 + i as f64))
        .collect();
    json!({"prices": prices, "total_volumes": volumes}).to_string()
}

pub fn markets_body(ids: &[&str]) -> String {
    let coins: Vec<serde_json::Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "id": id,
                "name": id.to_uppercase(),
                "symbol": &id[..3],
                "current_price": 1_000.0 / (i as f64 + 1.0),
                "price_change_percentage_24h": if i % 2 == 0 { 1.0 } else { -1.0 },
                "total_volume": 1.0e9,
                "market_cap": 1.0e11 / (i as f64 + 1.0),
                "image": format!("https://assets.example/{}.png", id)
            })
        })
        .collect();
    serde_json::Value::Array(coins).to_string()
}
