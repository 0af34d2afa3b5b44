use std::collections::HashMap;
use serde::{Deserialize, Serialize};

// Response schemas for the CoinGecko v3 endpoints the dashboard consumes.
// Only the fields we read are declared; everything else in the payload is ignored.

pub const PROVIDER_BASE_URL: &str = "https://api.coingecko.com/api/v3/";

/// `GET global`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalMarket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMarket {
    pub total_market_cap: UsdAmount,
    pub total_volume: UsdAmount,
    pub market_cap_change_percentage_24h_usd: f64,
    pub active_cryptocurrencies: u64,
    pub market_cap_percentage: DominanceShare,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsdAmount {
    pub usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DominanceShare {
    pub btc: f64,
}

/// One entry of `GET simple/price`, keyed by asset id in [`SimplePriceResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplePriceQuote {
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
}

pub type SimplePriceResponse = HashMap<String, SimplePriceQuote>;

/// `GET coins/{id}/market_chart`. Both series are `[timestamp_ms, value]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_volumes: Vec<(f64, f64)>,
}

/// One row of `GET coins/markets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}
