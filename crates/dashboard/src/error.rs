use thiserror::Error;

/// Why a single resource fetch produced no usable data.
///
/// Every variant is handled the same way at the slot boundary; the split only
/// exists so logs say what actually went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never completed (DNS, connect, timeout, reset).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The proxy or the provider answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The body was not JSON of the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON, but a record we depend on is missing.
    #[error("missing data for {0}")]
    Shape(String),

    #[error("invalid chart range: {0} days")]
    InvalidRange(u32),

    /// The task running the fetch panicked or was cancelled.
    #[error("Failed to fetch data")]
    Orchestration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
