use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use triage_common::{
    DuplicateCandidate, DuplicateVerdict, ExistingIssue, HotspotIssue, HotspotReport,
    ImageAnalysis, PriorityInput, PriorityResult, TextAnalysis,
};
use triage_engine::{analyze_hotspots_with, detect_duplicate, predict_priority, TextAnalyzer};

use crate::error::ApiError;
use crate::AppState;

// --- Request structs ---

#[derive(Deserialize)]
pub struct DuplicateRequest {
    title: String,
    description: String,
    category: String,
    #[serde(default)]
    existing_issues: Vec<ExistingIssue>,
}

#[derive(Deserialize)]
pub struct HotspotRequest {
    issues: Vec<HotspotIssue>,
}

#[derive(Deserialize)]
pub struct TextAnalysisRequest {
    text: String,
    title: Option<String>,
}

// --- Handlers ---

pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Civic Triage Engine",
        "status": "active",
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "triage-engine",
    }))
}

pub async fn api_detect_duplicate(
    body: Result<Json<DuplicateRequest>, JsonRejection>,
) -> Result<Json<DuplicateVerdict>, ApiError> {
    let Json(body) = body?;
    let candidate = DuplicateCandidate {
        title: body.title,
        description: body.description,
        category: body.category,
    };
    Ok(Json(detect_duplicate(&candidate, &body.existing_issues)))
}

pub async fn api_get_hotspots(
    State(state): State<Arc<AppState>>,
    body: Result<Json<HotspotRequest>, JsonRejection>,
) -> Result<Json<HotspotReport>, ApiError> {
    let Json(body) = body?;
    let report = analyze_hotspots_with(&body.issues, &state.hotspot_params)?;
    Ok(Json(report))
}

pub async fn api_predict_priority(
    body: Result<Json<PriorityInput>, JsonRejection>,
) -> Result<Json<PriorityResult>, ApiError> {
    let Json(input) = body?;
    Ok(Json(predict_priority(&input)?))
}

pub async fn api_analyze_text(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TextAnalysisRequest>, JsonRejection>,
) -> Result<Json<TextAnalysis>, ApiError> {
    let Json(body) = body?;
    let analysis = state
        .text_analyzer
        .analyze(&body.text, body.title.as_deref())
        .await?;
    Ok(Json(analysis))
}

pub async fn api_analyze_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ImageAnalysis>, ApiError> {
    let verdict = state.image_classifier.classify(&body).await?;
    // Image bytes are never logged.
    info!(
        bytes = body.len(),
        category = %verdict.detected_category,
        severity = %verdict.severity,
        "Image classified"
    );
    Ok(Json(verdict))
}
