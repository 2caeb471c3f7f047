//! Dashboard handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Local;
use serde::Serialize;

use crate::{AppError, AppState, CurrentUser};
use paisa_core::dashboard::{self, DashboardData, RequestContext};

/// Flattened dashboard for the printable/PDF view, rendered client-side
#[derive(Debug, Serialize)]
pub struct PrintableDashboard {
    pub username: String,
    /// "YYYY-MM-DD" the snapshot was taken
    pub generated_on: String,
    #[serde(flatten)]
    pub dashboard: DashboardData,
}

/// GET /api/dashboard - The full dashboard payload
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<DashboardData>, AppError> {
    let ctx = RequestContext::new(user, Local::now().date_naive());
    Ok(Json(dashboard::compose(&state.db, &ctx)))
}

/// GET /api/dashboard/print - Dashboard snapshot for print/PDF rendering
pub async fn get_printable_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<PrintableDashboard>, AppError> {
    let today = Local::now().date_naive();
    let username = user.username.clone();
    let ctx = RequestContext::new(user, today);

    Ok(Json(PrintableDashboard {
        username,
        generated_on: today.to_string(),
        dashboard: dashboard::compose(&state.db, &ctx),
    }))
}
