// Shared market model used by both the proxy server and the dashboard controller

pub mod format;
pub mod logging;
pub mod provider;
pub mod types;

pub use format::{format_change, format_currency, format_price, format_volume, round_to};
pub use logging::{init_logging_with, parse_level_filter};
pub use provider::{
    GlobalMarket, GlobalResponse, MarketChartResponse, MarketCoin, SimplePriceQuote,
    SimplePriceResponse, PROVIDER_BASE_URL,
};
pub use types::{
    chart_points, ranked_assets, ChangeType, ChartPoint, GlobalStats, HeadlineMetric,
    RankedAsset, TimeRange, TrackedAsset, DEFAULT_ASSET_ID, TRACKED_ASSETS,
};
