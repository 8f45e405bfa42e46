//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use cashflow_core::ai::TextGenerator;

/// Text-generation backend status
#[derive(Debug, Serialize)]
pub struct AiStatus {
    pub backend: &'static str,
    pub host: String,
    pub model: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai: AiStatus,
}

/// GET /api/health - Server and AI backend status
///
/// The server itself is always "ok"; an unreachable model only shows up as
/// `ai.available = false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let generator = &state.generator;
    let available = generator.health_check().await;

    Json(HealthResponse {
        status: "ok",
        ai: AiStatus {
            backend: generator.backend_name(),
            host: generator.host().to_string(),
            model: generator.model().to_string(),
            available,
        },
    })
}
