//! CORS response headers.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from config.
///
/// An unparseable origin falls back to allowing any, which matches the
/// permissive behavior of the default config.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origin == "*" {
        return layer.allow_origin(Any);
    }

    match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                origin = %config.allowed_origin,
                "invalid CORS origin in config, allowing any"
            );
            layer.allow_origin(Any)
        }
    }
}
