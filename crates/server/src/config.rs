use log::info;
use std::path::Path;
use std::time::Duration;
use shared::PROVIDER_BASE_URL;

const ENV_FILE: &str = "crates/server/.env.server";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub provider_base_url: String,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, String> {
        let env_file_path = Path::new(ENV_FILE);
        if env_file_path.exists() {
            match dotenv::from_filename(ENV_FILE) {
                Ok(path) => println!("Loaded proxy settings from: {}", path.display()),
                Err(e) => println!("Failed to load {}: {}", ENV_FILE, e),
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("PROXY_HOST").unwrap_or_else(|| {
            println!("PROXY_HOST not set, using 0.0.0.0");
            "0.0.0.0".to_string()
        });

        let port = match lookup("PROXY_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("PROXY_PORT must be a port number, got {:?}", raw))?,
            None => {
                println!("PROXY_PORT not set, using default (3001)");
                3001
            }
        };

        let provider_base_url = lookup("PROVIDER_BASE_URL").unwrap_or_else(|| PROVIDER_BASE_URL.to_string());

        let cache_ttl = match lookup("UPSTREAM_CACHE_SECONDS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| format!("UPSTREAM_CACHE_SECONDS must be a number of seconds, got {:?}", raw))?,
            ),
            None => Duration::from_secs(30),
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| format!("REQUEST_TIMEOUT_SECONDS must be a number of seconds, got {:?}", raw))?
                    .max(1),
            ),
            None => Duration::from_secs(10),
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "INFO".to_string());

        Ok(ServerConfig {
            host,
            port,
            provider_base_url,
            cache_ttl,
            request_timeout,
            log_level,
        })
    }

    pub fn setup_logging(&self) {
        shared::init_logging_with(&self.log_level);
        info!("Proxy forwarding to {}", self.provider_base_url);
    }
}
