//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use paisa_core::db::NewBudget;
use paisa_core::models::{Budget, BudgetPeriod, BudgetStatus};

/// Request body for creating a budget
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub category_id: i64,
    pub amount: f64,
    /// "weekly" or "monthly"; defaults to monthly
    pub period: Option<String>,
    pub alert_threshold: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request body for updating a budget
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: Option<f64>,
    pub alert_threshold: Option<u32>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.db.list_budgets(user.id)?))
}

/// POST /api/budgets
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    let period = match body.period.as_deref() {
        Some(p) => p
            .parse::<BudgetPeriod>()
            .map_err(|_| AppError::bad_request("Period must be 'weekly' or 'monthly'"))?,
        None => BudgetPeriod::Monthly,
    };

    let budget = state.db.create_budget(
        user.id,
        &NewBudget {
            category_id: body.category_id,
            amount: body.amount,
            period,
            alert_threshold: body.alert_threshold,
            start_date: body.start_date,
            end_date: body.end_date,
        },
    )?;
    Ok(Json(budget))
}

/// PUT /api/budgets/:id
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.db.update_budget(
        user.id,
        id,
        body.amount,
        body.alert_threshold,
        body.end_date,
    )?;
    Ok(Json(budget))
}

/// DELETE /api/budgets/:id
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/budgets/status - Current-period evaluation of every budget
///
/// The client polls this while the app is open; it is cheap, read-only,
/// and purely advisory.
pub async fn budget_status(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    let today = Local::now().date_naive();
    Ok(Json(state.db.evaluate_budgets(user.id, today)?))
}
