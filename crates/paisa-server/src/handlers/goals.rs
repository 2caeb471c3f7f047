//! Goal and quick-save handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use paisa_core::db::NewGoal;
use paisa_core::models::{Goal, GoalPriority, GoalProgress, QuickSave};
use paisa_core::Error;

/// Request body for creating a goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// "low", "medium" or "high"; defaults to medium
    pub priority: Option<String>,
}

/// Request body for a quick-save
#[derive(Debug, Deserialize)]
pub struct QuickSaveRequest {
    pub amount: f64,
}

/// Response for the quick-save endpoint
///
/// Always 200 with a success flag; the client shows `message` on failure
/// and the "goal reached" celebration when the flag is set.
#[derive(Debug, Serialize)]
pub struct QuickSaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    pub goal_reached: bool,
}

/// GET /api/goals - All goals with computed progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<GoalProgress>>, AppError> {
    let today = Local::now().date_naive();
    Ok(Json(state.db.goal_progress_all(user.id, today)?))
}

/// POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let priority = match body.priority.as_deref() {
        Some(p) => p
            .parse::<GoalPriority>()
            .map_err(|_| AppError::bad_request("Priority must be 'low', 'medium' or 'high'"))?,
        None => GoalPriority::Medium,
    };

    let goal = state.db.create_goal(
        user.id,
        &NewGoal {
            name: body.name,
            target_amount: body.target_amount,
            start_date: body.start_date,
            end_date: body.end_date,
            priority,
        },
    )?;
    Ok(Json(goal))
}

/// GET /api/goals/:id - One goal with progress
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<GoalProgress>, AppError> {
    let goal = state
        .db
        .get_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(goal.progress(Local::now().date_naive())))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_goal(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/goals/:id/quick-save - One-off contribution toward a goal
///
/// Goal increment, audit record, and the mirrored "Savings" transaction
/// land atomically; a failure leaves no partial state behind.
pub async fn quick_save(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<QuickSaveRequest>,
) -> Result<Json<QuickSaveResponse>, AppError> {
    let today = Local::now().date_naive();

    match state.db.quick_save(user.id, id, body.amount, today) {
        Ok(outcome) => {
            info!(
                user = %user.username,
                goal = %outcome.goal_name,
                amount = body.amount,
                reached = outcome.goal_reached,
                "Quick-save recorded"
            );
            Ok(Json(QuickSaveResponse {
                success: true,
                message: None,
                goal_name: Some(outcome.goal_name),
                new_amount: Some(outcome.new_amount),
                target_amount: Some(outcome.target_amount),
                goal_reached: outcome.goal_reached,
            }))
        }
        // Expected failures surface as a friendly flag, not an HTTP error
        Err(Error::QuickSave(message)) => Ok(Json(QuickSaveResponse {
            success: false,
            message: Some(message),
            goal_name: None,
            new_amount: None,
            target_amount: None,
            goal_reached: false,
        })),
        Err(other) => Err(other.into()),
    }
}

/// GET /api/goals/:id/quick-saves - Audit trail for one goal
pub async fn list_quick_saves(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<QuickSave>>, AppError> {
    state
        .db
        .get_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(state.db.list_quick_saves(user.id, id)?))
}
