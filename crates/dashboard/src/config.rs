use std::path::{Path, PathBuf};
use std::time::Duration;
use shared::{TimeRange, DEFAULT_ASSET_ID, PROVIDER_BASE_URL};

use crate::error::ConfigError;
use crate::merge::FallbackPolicy;

const ENV_FILE: &str = "crates/dashboard/.env.dashboard";
const DEFAULT_REFRESH_INTERVAL_MS: i64 = 30_000;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub proxy_base_url: Option<String>,
    pub provider_base_url: String,
    /// `None` disables auto-refresh.
    pub refresh_interval: Option<Duration>,
    pub fallback_policy: FallbackPolicy,
    pub default_coin: String,
    pub default_range: TimeRange,
    pub request_timeout: Duration,
    pub report_dir: PathBuf,
    pub write_report: bool,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            proxy_base_url: None,
            provider_base_url: PROVIDER_BASE_URL.to_string(),
            refresh_interval: refresh_interval_from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            fallback_policy: FallbackPolicy::default(),
            default_coin: DEFAULT_ASSET_ID.to_string(),
            default_range: TimeRange::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            report_dir: PathBuf::from("."),
            write_report: false,
            log_level: "INFO".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads `.env.dashboard` (if present) and reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(ENV_FILE).exists() {
            match dotenv::from_filename(ENV_FILE) {
                Ok(path) => println!("Loaded dashboard settings from: {}", path.display()),
                Err(e) => println!("Failed to load {}: {}", ENV_FILE, e),
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Missing keys fall back
    /// to defaults, malformed values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DashboardConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let proxy_base_url = get("PROXY_BASE_URL");
        let provider_base_url = get("PROVIDER_BASE_URL").unwrap_or(defaults.provider_base_url);

        let refresh_interval = match get("REFRESH_INTERVAL_MS") {
            Some(raw) => {
                let millis: i64 = raw.parse().map_err(|_| invalid("REFRESH_INTERVAL_MS", &raw, "expected milliseconds"))?;
                refresh_interval_from_millis(millis)
            }
            None => defaults.refresh_interval,
        };

        let fallback_policy = match get("FALLBACK_POLICY") {
            Some(raw) => raw.parse().map_err(|reason: String| invalid("FALLBACK_POLICY", &raw, &reason))?,
            None => defaults.fallback_policy,
        };

        let default_range = match get("DEFAULT_RANGE") {
            Some(raw) => raw.parse().map_err(|reason: String| invalid("DEFAULT_RANGE", &raw, &reason))?,
            None => defaults.default_range,
        };

        let request_timeout = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| invalid("REQUEST_TIMEOUT_SECONDS", &raw, "expected seconds"))?;
                Duration::from_secs(secs.max(1))
            }
            None => defaults.request_timeout,
        };

        let write_report = match get("WRITE_REPORT") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| invalid("WRITE_REPORT", &raw, "expected true or false"))?,
            None => defaults.write_report,
        };

        Ok(DashboardConfig {
            proxy_base_url,
            provider_base_url,
            refresh_interval,
            fallback_policy,
            default_coin: get("DEFAULT_COIN").unwrap_or(defaults.default_coin),
            default_range,
            request_timeout,
            report_dir: get("REPORT_DIR").map(PathBuf::from).unwrap_or(defaults.report_dir),
            write_report,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

/// Zero or negative intervals turn auto-refresh off.
pub fn refresh_interval_from_millis(millis: i64) -> Option<Duration> {
    u64::try_from(millis)
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
