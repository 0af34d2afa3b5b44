use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Endpoint parameter is required")]
    MissingEndpoint,

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CoinGecko API responded with status: {0}")]
    UpstreamStatus(u16),

    #[error("provider returned invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingEndpoint => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // upstream details stay in the logs
        let message = match self {
            ProxyError::MissingEndpoint => "Endpoint parameter is required",
            _ => "Failed to fetch cryptocurrency data",
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_missing_endpoint_response() {
        let response = ProxyError::MissingEndpoint.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Endpoint parameter is required");
    }

    #[actix_web::test]
    async fn test_upstream_errors_are_generic() {
        let response = ProxyError::UpstreamStatus(429).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to fetch cryptocurrency data");
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            ProxyError::UpstreamStatus(503).to_string(),
            "CoinGecko API responded with status: 503"
        );
    }
}
