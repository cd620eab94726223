//! Prometheus text exposition for the default registry.

use axum::http::StatusCode;
use prometheus::TextEncoder;

pub async fn render() -> Result<String, StatusCode> {
    TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .map_err(|e| {
            log::error!("metrics encoding failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
