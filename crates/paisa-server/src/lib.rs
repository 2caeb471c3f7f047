//! Paisa Web Server
//!
//! Axum-based REST API for the Paisa budget tracker.
//!
//! Security posture:
//! - Session-token authentication on every data route
//! - Restrictive CORS policy (same-origin unless origins are configured)
//! - Input validation (pagination limits, positive amounts, date formats)
//! - Sanitized error responses; internals only reach the logs

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, warn};

use paisa_core::db::Database;
use paisa_core::models::User;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// How long a login session stays valid
pub const SESSION_TTL_DAYS: i64 = 30;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// The authenticated user, inserted into request extensions by the
/// auth middleware
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware - resolves the session token to a user
///
/// Every route behind this layer can rely on a `CurrentUser` extension.
/// Unknown and expired tokens both get the same 401.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers());

    let user = match token {
        Some(token) => match state.db.user_for_session(token) {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "Session lookup failed");
                None
            }
        },
        None => None,
    };

    match user {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // Login and registration are the only unauthenticated routes
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        .route("/auth/logout", post(handlers::logout))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/print", get(handlers::get_printable_dashboard))
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/budgets/status", get(handlers::budget_status))
        .route(
            "/budgets/:id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        // Goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal).delete(handlers::delete_goal),
        )
        .route("/goals/:id/quick-save", post(handlers::quick_save))
        .route("/goals/:id/quick-saves", get(handlers::list_quick_saves))
        // Insights
        .route("/insights", get(handlers::list_insights))
        .route("/insights/unread-count", get(handlers::count_unread_insights))
        .route("/insights/refresh", post(handlers::refresh_insights))
        .route("/insights/:id/read", post(handlers::mark_insight_read))
        // Import / export
        .route("/import/transactions", post(handlers::import_transactions))
        .route("/export/transactions", get(handlers::export_transactions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes).with_state(state);

    let mut app = Router::new().nest("/api", api_routes);

    // Serve the client pages when a static directory is configured
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = if config.allowed_origins.is_empty() {
        // Same-origin only; the browser never sends cross-origin requests
        CorsLayer::new()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<paisa_core::Error> for AppError {
    fn from(err: paisa_core::Error) -> Self {
        use paisa_core::Error as E;

        let status = match &err {
            E::NotFound(_) => StatusCode::NOT_FOUND,
            E::InvalidCredentials => StatusCode::UNAUTHORIZED,
            E::UsernameTaken => StatusCode::CONFLICT,
            E::InvalidData(_) | E::QuickSave(_) | E::Import(_) | E::Csv(_) => {
                StatusCode::BAD_REQUEST
            }
            E::Database(_) | E::Pool(_) | E::Io(_) | E::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            Self {
                status,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err.into()),
            }
        } else {
            Self {
                status,
                message: err.to_string(),
                internal: None,
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}
