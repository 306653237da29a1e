use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppConfig;
use crate::error::BlinksError;

/// Apply CORS middleware to the router based on configuration
///
/// Disabled entirely by `cors_enabled = false`. An empty origin list or one
/// containing "*" allows every origin; otherwise only the listed origins are
/// allowed, with credentials.
pub fn apply_cors<S>(router: Router<S>, config: &AppConfig) -> Result<Router<S>, BlinksError>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.cors_enabled {
        tracing::info!("CORS disabled via configuration");
        return Ok(router);
    }

    let cors_layer = build_cors_layer(&config.cors_allowed_origins)?;

    tracing::info!(
        origins = ?config.cors_allowed_origins,
        "CORS enabled"
    );

    Ok(router.layer(cors_layer))
}

fn build_cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, BlinksError> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        // Credentials cannot be combined with a wildcard origin
        return Ok(cors.allow_origin(AllowOrigin::any()));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                BlinksError::InternalServerError(format!("Invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}
