// Static stand-in datasets used when a slot's fetch fails under the placeholder policy

use chrono::{Duration, Utc};
use rand::Rng;
use shared::{ChartPoint, GlobalStats, HeadlineMetric, RankedAsset, SimplePriceQuote, TRACKED_ASSETS};

const PLACEHOLDER_BASE_PRICE: f64 = 43_000.0;
const PLACEHOLDER_BASE_VOLUME: f64 = 25_000_000_000.0;
const MAX_PLACEHOLDER_POINTS: u32 = 365;

pub fn placeholder_global() -> GlobalStats {
    GlobalStats {
        total_market_cap: 1_720_000_000_000.0,
        total_volume: 68_400_000_000.0,
        market_cap_change_24h: 2.1,
        active_cryptocurrencies: 10_847,
        btc_dominance: 52.3,
    }
}

pub fn placeholder_metrics() -> Vec<HeadlineMetric> {
    // (price, 24h change, 24h volume, market cap), in basket order
    let quotes = [
        (43_250.0, 2.4, 28_500_000_000.0, 847_000_000_000.0),
        (2_580.0, 1.8, 15_200_000_000.0, 310_000_000_000.0),
        (315.0, -0.6, 1_100_000_000.0, 48_500_000_000.0),
        (98.5, -1.3, 2_300_000_000.0, 42_700_000_000.0),
    ];

    TRACKED_ASSETS
        .iter()
        .zip(quotes)
        .map(|(asset, (usd, change, volume, market_cap))| {
            let quote = SimplePriceQuote {
                usd,
                usd_24h_change: Some(change),
                usd_24h_vol: Some(volume),
                usd_market_cap: Some(market_cap),
            };
            HeadlineMetric::from_quote(asset, &quote)
        })
        .collect()
}

pub fn placeholder_ranking() -> Vec<RankedAsset> {
    let coins: [(&str, &str, &str, f64, f64, f64, f64); 10] = [
        ("bitcoin", "Bitcoin", "BTC", 43_250.0, 2.4, 28_500_000_000.0, 847_000_000_000.0),
        ("ethereum", "Ethereum", "ETH", 2_580.0, 1.8, 15_200_000_000.0, 310_000_000_000.0),
        ("tether", "Tether", "USDT", 1.0, 0.01, 45_000_000_000.0, 91_000_000_000.0),
        ("binancecoin", "BNB", "BNB", 315.0, -0.6, 1_100_000_000.0, 48_500_000_000.0),
        ("solana", "Solana", "SOL", 98.5, -1.3, 2_300_000_000.0, 42_700_000_000.0),
        ("ripple", "XRP", "XRP", 0.62, 0.9, 1_400_000_000.0, 33_800_000_000.0),
        ("usd-coin", "USDC", "USDC", 1.0, 0.0, 5_600_000_000.0, 24_900_000_000.0),
        ("cardano", "Cardano", "ADA", 0.52, -2.1, 410_000_000.0, 18_300_000_000.0),
        ("dogecoin", "Dogecoin", "DOGE", 0.085, 3.2, 620_000_000.0, 12_100_000_000.0),
        ("avalanche-2", "Avalanche", "AVAX", 36.4, -0.8, 540_000_000.0, 13_400_000_000.0),
    ];

    coins
        .iter()
        .zip(1u32..)
        .map(|(&(id, name, symbol, price, change_24h, volume, market_cap), rank)| RankedAsset {
            rank,
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
            change_24h,
            volume,
            market_cap,
            image: None,
        })
        .collect()
}

/// A random-walk series ending now: hourly points for a one-day range, daily
/// points up to a year, and at most a year's worth of evenly spaced points for
/// longer ranges. Points older than the representable date range are left out.
pub fn placeholder_chart(days: u32) -> Vec<ChartPoint> {
    let (count, step) = if days <= 1 {
        (24, Duration::hours(1))
    } else if days <= MAX_PLACEHOLDER_POINTS {
        (days, Duration::days(1))
    } else {
        let span_secs = i64::from(days) * 86_400;
        (MAX_PLACEHOLDER_POINTS, Duration::seconds(span_secs / i64::from(MAX_PLACEHOLDER_POINTS)))
    };

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut price = PLACEHOLDER_BASE_PRICE;

    (0..count as i32)
        .rev()
        .filter_map(|steps_back| {
            price *= 1.0 + rng.gen_range(-0.03..0.03);
            let volume = PLACEHOLDER_BASE_VOLUME * rng.gen_range(0.7..1.3);
            let at = now.checked_sub_signed(step * steps_back)?;
            Some(ChartPoint::new(at.timestamp_millis(), price, volume))
        })
        .collect()
}
