//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use cashflow_core::categorize::CategorySuggester;
use cashflow_core::models::{Category, NewTransaction, Transaction, TransactionType};
use cashflow_core::period::Granularity;

/// Query parameters for listing transactions
///
/// Missing bounds default to the current calendar month.
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/transactions - List transactions in an inclusive date range
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let month = Granularity::Monthly.current_period(Local::now().date_naive());
    let from = params.from.unwrap_or(month.start);
    let to = params.to.unwrap_or(month.end);

    let transactions = state.db.list_transactions(from, to)?;
    Ok(Json(transactions))
}

/// Request body for recording a transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: i64,
    /// Defaults to today
    pub transaction_date: Option<NaiveDate>,
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let new_tx = NewTransaction {
        transaction_type: body.transaction_type,
        amount: body.amount,
        description: body.description.unwrap_or_default(),
        category_id: body.category_id,
        transaction_date: body
            .transaction_date
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    let tx = state.db.create_transaction(&new_tx)?;

    info!(
        id = tx.id,
        kind = %tx.transaction_type,
        amount = %tx.amount,
        date = %tx.transaction_date,
        "Recorded transaction"
    );

    Ok((StatusCode::CREATED, Json(tx)))
}

/// Request body for a category suggestion
#[derive(Debug, Deserialize)]
pub struct SuggestCategoryRequest {
    pub description: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

#[derive(Debug, Serialize)]
pub struct SuggestCategoryResponse {
    pub category: Option<Category>,
    pub confidence: String,
    pub message: String,
    pub reasoning: String,
}

/// POST /api/transactions/suggest-category - Ask the model for a category
pub async fn suggest_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SuggestCategoryRequest>,
) -> Result<Json<SuggestCategoryResponse>, AppError> {
    let categories = state.db.list_categories()?;
    let suggestion = CategorySuggester::new(&state.generator)
        .suggest(&categories, &body.description, body.transaction_type)
        .await?;

    let message = if suggestion.category.is_some() {
        "Category suggestion successful"
    } else {
        "No matching category found for this transaction"
    };

    Ok(Json(SuggestCategoryResponse {
        category: suggestion.category,
        confidence: suggestion.confidence,
        message: message.to_string(),
        reasoning: suggestion.reasoning,
    }))
}
