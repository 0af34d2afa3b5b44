use log::{info, LevelFilter};

// Logging bootstrap shared by the proxy server and the dashboard binary

/// Maps a `LOG_LEVEL` value onto a filter, defaulting to `Info` for anything unknown.
pub fn parse_level_filter(level: &str) -> LevelFilter {
    match level.trim().to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the global env_logger. Calling it again is a no-op.
pub fn init_logging_with(log_level: &str) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(parse_level_filter(log_level));

    // HTTP client internals are only interesting when something is broken
    builder.filter_module("hyper", LevelFilter::Warn);
    builder.filter_module("reqwest", LevelFilter::Warn);

    if builder.try_init().is_ok() {
        info!("Logging initialized with level: {}", log_level);
    }
}
