//! Response helpers.
//!
//! # Responsibilities
//! - Build the fixed error responses the dev server emits
//! - Compute the cache directive for static assets
//!
//! # Design Decisions
//! - Render failures never leak error details to the browser
//! - Upstream failures map to 502 Bad Gateway

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::AssetsConfig;

pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal server error";

/// Fixed response for a failed render.
pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
}

/// Response for an unreachable upstream.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

/// `Cache-Control` value for files under the asset prefix.
pub fn asset_cache_control(config: &AssetsConfig) -> HeaderValue {
    if config.cache {
        HeaderValue::from_str(&format!("public, max-age={}", config.max_age_secs))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    } else {
        HeaderValue::from_static("no-cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_control_follows_config() {
        let mut config = AssetsConfig::default();
        assert_eq!(asset_cache_control(&config), "public, max-age=2592000");
        config.cache = false;
        assert_eq!(asset_cache_control(&config), "no-cache");
    }

    #[test]
    fn internal_error_is_fixed() {
        assert_eq!(internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
