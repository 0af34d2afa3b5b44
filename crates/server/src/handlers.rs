use actix_web::{get, options, web, HttpResponse, HttpResponseBuilder, Responder};
use log::{error, info};
use std::time::SystemTime;

use crate::error::ProxyError;
use crate::types::{AppState, CryptoQuery};

const CACHE_CONTROL: &str = "public, s-maxage=30, stale-while-revalidate=60";

fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type, Authorization"));
    builder
}

#[get("/api/crypto")]
pub async fn proxy_crypto(
    query: web::Query<CryptoQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ProxyError> {
    let endpoint = query.target().ok_or(ProxyError::MissingEndpoint)?;

    let body = match data.cached(&endpoint) {
        Some(body) => {
            info!("Serving {} from cache", endpoint);
            body
        }
        None => {
            let body = data.upstream.get(&endpoint).await.map_err(|e| {
                error!("CoinGecko API error for {}: {}", endpoint, e);
                e
            })?;
            data.store(&endpoint, body.clone());
            body
        }
    };

    Ok(with_cors(HttpResponse::Ok())
        .insert_header(("Cache-Control", CACHE_CONTROL))
        .json(body))
}

#[options("/api/crypto")]
pub async fn crypto_preflight() -> impl Responder {
    with_cors(HttpResponse::Ok()).finish()
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    web::Json(serde_json::json!({
        "status": "ok",
        "timestamp": SystemTime::now()
    }))
}
