//! Export handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
    Extension,
};
use serde::Deserialize;
use tracing::info;

use crate::handlers::transactions::parse_date_param;
use crate::{AppError, AppState, CurrentUser};
use paisa_core::export::ExportOptions;

/// Query parameters for transaction export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Output format (default: csv)
    #[serde(default = "default_format")]
    pub format: String,
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /api/export/transactions - Download transactions as CSV or JSON
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let opts = ExportOptions {
        from: parse_date_param(params.from.as_deref(), "from")?,
        to: parse_date_param(params.to.as_deref(), "to")?,
    };

    match params.format.as_str() {
        "csv" => {
            let csv = state.db.export_transactions_csv(user.id, &opts)?;
            let lines = csv.lines().count().saturating_sub(1);
            info!(user = %user.username, rows = lines, "Exported transactions to CSV");

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"transactions.csv\"",
                )
                .body(Body::from(csv))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        "json" => {
            let rows = state.db.export_transactions(user.id, &opts)?;
            let json = serde_json::to_string_pretty(&rows)
                .map_err(|e| AppError::internal(&e.to_string()))?;
            info!(user = %user.username, rows = rows.len(), "Exported transactions to JSON");

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .header(
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"transactions.json\"",
                )
                .body(Body::from(json))
                .map_err(|e| AppError::internal(&e.to_string()))
        }
        _ => Err(AppError::bad_request("Invalid format. Use 'csv' or 'json'")),
    }
}
