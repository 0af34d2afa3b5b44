use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::Serialize;
use shared::{GlobalStats, RankedAsset};

use crate::analysis::average_change;
use crate::error::ReportError;

const REPORT_ASSET_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Summary,
    Detailed,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Detailed => "detailed",
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(ReportKind::Summary),
            "detailed" => Ok(ReportKind::Detailed),
            "weekly" => Ok(ReportKind::Weekly),
            "monthly" => Ok(ReportKind::Monthly),
            other => Err(format!("unknown report kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_market_cap: f64,
    pub avg_change: f64,
    pub top_performer: Option<RankedAsset>,
    pub worst_performer: Option<RankedAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub cryptos: Vec<RankedAsset>,
    pub summary: ReportSummary,
}

/// Builds a report from the current ranking. Total market cap comes from the
/// global stats and is zero when they are not loaded yet.
pub fn build_report(
    kind: ReportKind,
    ranking: &[RankedAsset],
    global: Option<&GlobalStats>,
    now: DateTime<Utc>,
) -> MarketReport {
    let top_performer = ranking
        .iter()
        .max_by(|a, b| a.change_24h.total_cmp(&b.change_24h))
        .cloned();
    let worst_performer = ranking
        .iter()
        .min_by(|a, b| a.change_24h.total_cmp(&b.change_24h))
        .cloned();

    MarketReport {
        date: now.date_naive(),
        kind,
        cryptos: ranking.iter().take(REPORT_ASSET_LIMIT).cloned().collect(),
        summary: ReportSummary {
            total_market_cap: global.map(|g| g.total_market_cap).unwrap_or(0.0),
            avg_change: average_change(ranking),
            top_performer,
            worst_performer,
        },
    }
}

pub fn report_file_name(report: &MarketReport) -> String {
    format!("crypto-report-{}-{}.json", report.kind, report.date.format("%Y-%m-%d"))
}

/// Writes the report as pretty JSON into `dir` and returns the file path.
pub fn write_report(report: &MarketReport, dir: &Path) -> Result<PathBuf, ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(report));
    fs::write(&path, json)?;
    info!("Wrote {} report to {}", report.kind, path.display());
    Ok(path)
}
