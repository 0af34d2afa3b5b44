// Proxy Server
// Forwards /api/crypto requests to the market data provider with CORS and cache headers

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use reqwest::Client;
use std::sync::Arc;

mod config;
mod error;
mod handlers;
mod types;
mod upstream;

use config::ServerConfig;
use handlers::{crypto_preflight, health_check, proxy_crypto};
use types::AppState;
use upstream::CoinGeckoUpstream;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::load().map_err(|e| {
        eprintln!("Failed to load proxy configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    config.setup_logging();

    let client = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let upstream = Arc::new(CoinGeckoUpstream::new(client, config.provider_base_url.clone()));
    let state = web::Data::new(AppState::new(upstream, config.cache_ttl));

    info!("Starting crypto proxy on http://{}:{}", config.host, config.port);
    info!("Upstream responses cached for {}s", config.cache_ttl.as_secs());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(proxy_crypto)
            .service(crypto_preflight)
            .service(health_check)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
