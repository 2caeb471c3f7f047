//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use paisa_core::insights::InsightEngine;
use paisa_core::models::Insight;

/// Query parameters for listing insights
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Only unread insights when true
    #[serde(default)]
    pub unread: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

/// Response for insight refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub generated: Vec<Insight>,
}

/// GET /api/insights - List persisted insights, newest first
pub async fn list_insights(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let limit = params.limit.clamp(1, crate::MAX_PAGE_LIMIT);
    Ok(Json(state.db.list_insights(user.id, params.unread, limit)?))
}

/// GET /api/insights/unread-count - Badge counter
pub async fn count_unread_insights(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<i64>, AppError> {
    Ok(Json(state.db.count_unread_insights(user.id)?))
}

/// POST /api/insights/:id/read - Mark one insight as read
pub async fn mark_insight_read(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.mark_insight_read(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/insights/refresh - Re-run the heuristic battery for the
/// current month and return what fired
pub async fn refresh_insights(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<RefreshResponse>, AppError> {
    let today = Local::now().date_naive();
    let month_start = today.with_day(1).expect("day 1 always valid");

    let engine = InsightEngine::new();
    let generated = engine.run_for_user(&state.db, user.id, (month_start, today))?;

    Ok(Json(RefreshResponse { generated }))
}
