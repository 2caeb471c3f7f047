//! Web server command

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use paisa_server::{create_router, ServerConfig};

use super::open_database;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allow_origins: Vec<String>,
) -> Result<()> {
    let db = open_database(db_path)?;

    let config = ServerConfig {
        allowed_origins: allow_origins,
    };

    let static_dir = static_dir.map(|p| p.to_string_lossy().into_owned());
    let app = create_router(db, static_dir.as_deref(), config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Paisa listening on http://{}", addr);
    if let Some(dir) = &static_dir {
        info!("Serving client pages from {}", dir);
    }

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
