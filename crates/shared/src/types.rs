use std::fmt;
use std::str::FromStr;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{format_change, format_price, format_volume, round_to};
use crate::provider::{GlobalMarket, MarketChartResponse, MarketCoin, SimplePriceQuote};

// View records shared by the dashboard controller and its consumers

/// An asset that always gets a headline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const TRACKED_ASSETS: [TrackedAsset; 4] = [
    TrackedAsset { id: "bitcoin", name: "Bitcoin", symbol: "BTC" },
    TrackedAsset { id: "ethereum", name: "Ethereum", symbol: "ETH" },
    TrackedAsset { id: "binancecoin", name: "BNB", symbol: "BNB" },
    TrackedAsset { id: "solana", name: "Solana", symbol: "SOL" },
];

pub const DEFAULT_ASSET_ID: &str = "bitcoin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub market_cap_change_24h: f64,
    pub active_cryptocurrencies: u64,
    pub btc_dominance: f64,
}

impl From<GlobalMarket> for GlobalStats {
    fn from(market: GlobalMarket) -> Self {
        GlobalStats {
            total_market_cap: market.total_market_cap.usd,
            total_volume: market.total_volume.usd,
            market_cap_change_24h: market.market_cap_change_percentage_24h_usd,
            active_cryptocurrencies: market.active_cryptocurrencies,
            btc_dominance: market.market_cap_percentage.btc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
}

impl ChangeType {
    pub fn classify(change: f64) -> Self {
        if change > 0.0 {
            ChangeType::Positive
        } else {
            ChangeType::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineMetric {
    pub id: String,
    pub title: String,
    pub value: String,
    pub change: String,
    pub change_type: ChangeType,
    pub volume: String,
    pub market_cap: String,
}

impl HeadlineMetric {
    pub fn from_quote(asset: &TrackedAsset, quote: &SimplePriceQuote) -> Self {
        let change = quote.usd_24h_change.unwrap_or(0.0);
        HeadlineMetric {
            id: asset.id.to_string(),
            title: asset.name.to_string(),
            value: format!("${}", format_price(quote.usd)),
            change: format_change(change),
            change_type: ChangeType::classify(change),
            volume: format_volume(quote.usd_24h_vol.unwrap_or(0.0)),
            market_cap: format_volume(quote.usd_market_cap.unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
    pub volume: f64,
    pub timestamp: i64,
}

impl ChartPoint {
    pub fn new(timestamp: i64, price: f64, volume: f64) -> Self {
        ChartPoint {
            date: date_label(timestamp),
            price: round_to(price, 2),
            volume: volume.round(),
            timestamp,
        }
    }
}

/// Zips the price and volume series by index.
///
/// The price series decides the length; an index with no matching volume entry
/// gets a volume of zero.
pub fn chart_points(chart: &MarketChartResponse) -> Vec<ChartPoint> {
    chart
        .prices
        .iter()
        .enumerate()
        .map(|(index, &(timestamp, price))| {
            let volume = chart
                .total_volumes
                .get(index)
                .map(|&(_, volume)| volume)
                .unwrap_or(0.0);
            ChartPoint::new(timestamp as i64, price, volume)
        })
        .collect()
}

fn date_label(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAsset {
    pub rank: u32,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub image: Option<String>,
}

impl RankedAsset {
    pub fn from_market(rank: u32, coin: MarketCoin) -> Self {
        RankedAsset {
            rank,
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol.to_uppercase(),
            price: coin.current_price,
            change_24h: coin.price_change_percentage_24h.unwrap_or(0.0),
            volume: coin.total_volume.unwrap_or(0.0),
            market_cap: coin.market_cap.unwrap_or(0.0),
            image: coin.image,
        }
    }
}

/// Ranks are assigned by position, starting at 1.
pub fn ranked_assets(coins: Vec<MarketCoin>) -> Vec<RankedAsset> {
    coins
        .into_iter()
        .zip(1u32..)
        .map(|(coin, rank)| RankedAsset::from_market(rank, coin))
        .collect()
}

/// The three chart ranges the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    pub fn days(self) -> u32 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            1 => Some(TimeRange::Day),
            7 => Some(TimeRange::Week),
            30 => Some(TimeRange::Month),
            _ => None,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" | "1d" => Ok(TimeRange::Day),
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            other => Err(format!("unknown time range '{}', expected 24h, 7d or 30d", other)),
        }
    }
}
