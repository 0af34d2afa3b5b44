// Market data refresh controller: polls the provider (through the proxy when
// one is configured) and publishes dashboard snapshots to subscribers.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod http;
pub mod merge;
pub mod report;
pub mod snapshot;
pub mod source;

pub use analysis::{analyze, correlation_points, CorrelationPoint, MarketAnalysis};
pub use config::DashboardConfig;
pub use controller::{ControllerOptions, DashboardController};
pub use error::{ConfigError, FetchError, ReportError};
pub use http::HttpMarketSource;
pub use merge::{FallbackPolicy, Slot};
pub use report::{build_report, write_report, MarketReport, ReportKind};
pub use snapshot::{DashboardSnapshot, RefreshEvent};
pub use source::MarketDataSource;
