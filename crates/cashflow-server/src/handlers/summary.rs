//! Ledger summary handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use cashflow_core::models::CategorySummary;
use cashflow_core::summary::{LedgerSummary, MonthlySummary};

/// Query parameters selecting one calendar month
///
/// Either part left out is taken from today.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl MonthQuery {
    fn resolve(&self) -> (i32, u32) {
        let today = Local::now().date_naive();
        (
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month()),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

/// GET /api/summary/balance - All-time income minus expense
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.db.balance()?;
    Ok(Json(BalanceResponse { balance }))
}

/// GET /api/summary/monthly - Income, expense and net for one month
pub async fn get_monthly_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let (year, month) = params.resolve();
    let summary = LedgerSummary::new(&state.db).monthly(year, month)?;
    Ok(Json(summary))
}

/// GET /api/summary/categories - Per-category totals for one month
pub async fn get_categories_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let (year, month) = params.resolve();
    let categories = LedgerSummary::new(&state.db).categories(year, month)?;
    Ok(Json(categories))
}
