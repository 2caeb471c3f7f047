//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_PAGE_LIMIT};
use paisa_core::models::{NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Request body for creating or editing a transaction
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub category_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub transaction_date: NaiveDate,
}

impl TransactionRequest {
    fn into_new(self) -> NewTransaction {
        NewTransaction {
            category_id: self.category_id,
            amount: self.amount,
            description: self.description,
            transaction_date: self.transaction_date,
        }
    }
}

pub(crate) fn parse_date_param(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request(&format!("Invalid '{}' date format (use YYYY-MM-DD)", name)))
}

/// GET /api/transactions - List with optional filters, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let from = parse_date_param(params.from.as_deref(), "from")?;
    let to = parse_date_param(params.to.as_deref(), "to")?;

    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions =
        state
            .db
            .list_transactions(user.id, from, to, params.category_id, limit, offset)?;
    Ok(Json(transactions))
}

/// POST /api/transactions
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<TransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state.db.add_transaction(user.id, &body.into_new())?;
    Ok(Json(transaction))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .get_transaction(user.id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// PUT /api/transactions/:id - The explicit edit path
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<TransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state.db.update_transaction(user.id, id, &body.into_new())?;
    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
