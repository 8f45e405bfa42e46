//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use cashflow_core::models::{Category, NewCategory, TransactionType};

/// Query parameters for listing categories
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// Only categories of this type (income, expense)
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// GET /api/categories - List categories, optionally by type
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = match params.category_type.as_deref() {
        Some(raw) => {
            let kind: TransactionType = raw.parse().map_err(|e: String| AppError::bad_request(&e))?;
            state.db.list_categories_by_type(kind)?
        }
        None => state.db.list_categories()?,
    };

    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.db.create_category(&body)?;

    info!(
        id = category.id,
        name = %category.name,
        "Created category"
    );

    Ok((StatusCode::CREATED, Json(category)))
}
