//! Import handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::{AppError, AppState, CurrentUser};
use paisa_core::import::ImportSummary;

/// POST /api/import/transactions - Bulk import from a CSV body
///
/// The client posts the raw file contents as `text/csv` with columns
/// `date,category,amount,description`. Bad rows are reported back; good
/// rows are inserted.
pub async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::bad_request("Empty import file"));
    }

    let summary = state.db.import_transactions_csv(user.id, body.as_bytes())?;
    info!(
        user = %user.username,
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV import complete"
    );
    Ok(Json(summary))
}
