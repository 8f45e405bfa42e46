//! Spending insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use cashflow_core::insights::InsightOrchestrator;
use cashflow_core::models::SpendingInsights;

/// Query parameters for insights
#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    /// weekly, monthly, quarterly or yearly (default monthly)
    pub period: Option<String>,
    /// Reference day for the period (default today)
    pub date: Option<NaiveDate>,
}

/// Insights plus the time they were produced
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    #[serde(flatten)]
    pub insights: SpendingInsights,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/ai/insights - Spending insights for the period containing today
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>, AppError> {
    let label = params.period.as_deref().unwrap_or("monthly");
    let reference = params.date.unwrap_or_else(|| Local::now().date_naive());

    let insights = InsightOrchestrator::new(&state.db, &state.generator)
        .get_insights_at(label, reference)
        .await?;

    Ok(Json(InsightsResponse {
        insights,
        generated_at: Utc::now(),
    }))
}
