//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use paisa_core::models::{Category, CategoryKind};

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// "income" or "expense"
    pub kind: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Request body for updating a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// GET /api/categories - Global categories plus the user's own
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_categories(user.id)?))
}

/// POST /api/categories - Create a user-owned category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let kind: CategoryKind = body
        .kind
        .parse()
        .map_err(|_| AppError::bad_request("Kind must be 'income' or 'expense'"))?;

    let category = state.db.create_category(
        user.id,
        &body.name,
        kind,
        body.color.as_deref(),
        body.icon.as_deref(),
    )?;
    Ok(Json(category))
}

/// PUT /api/categories/:id - Rename or restyle a user-owned category
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = state.db.update_category(
        user.id,
        id,
        body.name.as_deref(),
        body.color.as_deref(),
        body.icon.as_deref(),
    )?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_category(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
