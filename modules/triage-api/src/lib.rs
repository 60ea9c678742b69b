//! HTTP surface for the triage engine: JSON in, JSON out, no state beyond
//! configuration and the analyzer collaborators.

pub mod error;
pub mod rest;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use triage_common::{FileConfig, TriageError};
use triage_engine::{FallbackTextAnalyzer, HotspotParams, ImageClassifier, UnavailableImageClassifier};

pub use error::ApiError;

/// Uploaded images larger than this are rejected before classification.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub hotspot_params: HotspotParams,
    pub text_analyzer: FallbackTextAnalyzer,
    pub image_classifier: Arc<dyn ImageClassifier>,
}

impl AppState {
    /// Keyword-only text analysis and no image model.
    pub fn from_config(config: &FileConfig) -> Self {
        Self {
            hotspot_params: HotspotParams::from(&config.clustering),
            text_analyzer: FallbackTextAnalyzer::keywords_only(),
            image_classifier: Arc::new(UnavailableImageClassifier),
        }
    }
}

/// CORS restricted to the configured origins; any method and header.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, TriageError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| TriageError::Config(format!("invalid CORS origin: {origin:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(origins = origins.len(), "CORS origins configured");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(rest::index))
        .route("/health", get(rest::health))
        .route("/detect-duplicate", post(rest::api_detect_duplicate))
        .route("/get-hotspots", post(rest::api_get_hotspots))
        .route("/predict-priority", post(rest::api_predict_priority))
        .route("/analyze-text", post(rest::api_analyze_text))
        .route(
            "/analyze-image",
            post(rest::api_analyze_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .with_state(state)
        .layer(cors)
        // Complaint text and locations are not cacheable
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only, never request bodies
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
