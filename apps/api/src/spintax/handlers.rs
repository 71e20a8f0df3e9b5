//! Axum route handlers for the Spintax API.
//!
//! Thin JSON wrappers around the engine. None of these reject malformed
//! spintax; `/validate` is the only endpoint that reports it.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::spintax::{
    count_spintax, extract_options, get_all_variations, get_variation_count, highlight,
    resolve, resolve_with, validate, RandomPicker, Segment, ValidationReport, MAX_VARIATIONS,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub text: String,
    /// Number of independent resolutions; clamped to `1..=max_batch`.
    pub count: Option<usize>,
    /// Makes the batch reproducible.
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub results: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub variations: Vec<String>,
    /// Product of option counts; may exceed `variations.len()`.
    pub theoretical_count: u64,
    /// True when enumeration stopped at the cap.
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub block_count: usize,
    pub options: Vec<Vec<String>>,
    pub variation_count: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/spintax/resolve
pub async fn handle_resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Json<ResolveResponse> {
    let count = request.count.unwrap_or(1).clamp(1, state.config.max_batch);

    let results = match request.seed {
        Some(seed) => {
            let mut picker = RandomPicker::seeded(seed);
            (0..count)
                .map(|_| resolve_with(&request.text, &mut picker))
                .collect()
        }
        None => (0..count).map(|_| resolve(&request.text)).collect(),
    };

    Json(ResolveResponse { results })
}

/// POST /api/v1/spintax/variations
pub async fn handle_variations(Json(request): Json<TextRequest>) -> Json<VariationsResponse> {
    let theoretical_count = get_variation_count(&request.text);
    Json(VariationsResponse {
        variations: get_all_variations(&request.text),
        theoretical_count,
        truncated: theoretical_count > MAX_VARIATIONS as u64,
    })
}

/// POST /api/v1/spintax/validate
pub async fn handle_validate(Json(request): Json<TextRequest>) -> Json<ValidationReport> {
    Json(validate(&request.text))
}

/// POST /api/v1/spintax/highlight
pub async fn handle_highlight(Json(request): Json<TextRequest>) -> Json<HighlightResponse> {
    Json(HighlightResponse {
        segments: highlight(&request.text),
    })
}

/// POST /api/v1/spintax/analyze
pub async fn handle_analyze(Json(request): Json<TextRequest>) -> Json<AnalyzeResponse> {
    Json(AnalyzeResponse {
        block_count: count_spintax(&request.text),
        options: extract_options(&request.text),
        variation_count: get_variation_count(&request.text),
    })
}
