use serde::Serialize;
use shared::RankedAsset;

/// Aggregate view over the ranked listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    pub total_market_cap: f64,
    pub gainers: usize,
    pub losers: usize,
    pub avg_change: f64,
    pub top_gainer: Option<RankedAsset>,
    pub top_loser: Option<RankedAsset>,
    pub asset_count: usize,
}

impl MarketAnalysis {
    pub fn is_bullish(&self) -> bool {
        self.avg_change > 0.0
    }

    /// More assets gained than lost over 24h.
    pub fn is_optimistic(&self) -> bool {
        self.gainers > self.losers
    }

    /// Percentage of listed assets that gained over 24h.
    pub fn gainer_share(&self) -> f64 {
        share(self.gainers, self.asset_count)
    }

    pub fn loser_share(&self) -> f64 {
        share(self.losers, self.asset_count)
    }
}

/// One dot of the volatility/volume scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub name: String,
    pub symbol: String,
    /// Absolute 24h change, in percent.
    pub x: f64,
    /// 24h volume in billions of USD.
    pub y: f64,
    pub market_cap: f64,
    pub change_24h: f64,
}

/// Returns `None` for an empty listing.
pub fn analyze(ranking: &[RankedAsset]) -> Option<MarketAnalysis> {
    if ranking.is_empty() {
        return None;
    }

    let total_market_cap = ranking.iter().map(|asset| asset.market_cap).sum();
    let gainers = ranking.iter().filter(|asset| asset.change_24h > 0.0).count();
    let losers = ranking.iter().filter(|asset| asset.change_24h < 0.0).count();

    let top_gainer = ranking
        .iter()
        .filter(|asset| asset.change_24h > 0.0)
        .max_by(|a, b| a.change_24h.total_cmp(&b.change_24h))
        .cloned();
    let top_loser = ranking
        .iter()
        .filter(|asset| asset.change_24h < 0.0)
        .min_by(|a, b| a.change_24h.total_cmp(&b.change_24h))
        .cloned();

    Some(MarketAnalysis {
        total_market_cap,
        gainers,
        losers,
        avg_change: average_change(ranking),
        top_gainer,
        top_loser,
        asset_count: ranking.len(),
    })
}

pub fn correlation_points(ranking: &[RankedAsset]) -> Vec<CorrelationPoint> {
    ranking
        .iter()
        .map(|asset| CorrelationPoint {
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            x: asset.change_24h.abs(),
            y: asset.volume / 1e9,
            market_cap: asset.market_cap,
            change_24h: asset.change_24h,
        })
        .collect()
}

/// Mean 24h change, zero for an empty listing.
pub fn average_change(ranking: &[RankedAsset]) -> f64 {
    if ranking.is_empty() {
        return 0.0;
    }
    ranking.iter().map(|asset| asset.change_24h).sum::<f64>() / ranking.len() as f64
}

fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
