use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use super::handlers::{self, AppState};
use crate::application::services::TaskService;
use crate::infrastructure::config::AppConfig;

/// API routes plus the static web client as fallback.
pub fn build_router(task_service: Arc<TaskService>, web_dir: &Path) -> Router {
    let state = AppState { task_service };

    Router::new()
        .route("/api/nextdate", get(handlers::next_date))
        .route(
            "/api/task",
            post(handlers::add_task)
                .get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/tasks", get(handlers::list_tasks))
        .route("/api/task/done", post(handlers::complete_task))
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
}

/// Bind to `0.0.0.0:{config.port}` and serve until Ctrl-C.
pub async fn run_server(config: &AppConfig, task_service: Arc<TaskService>) -> Result<()> {
    if !config.web_dir.is_dir() {
        warn!("Web directory {} not found, static files disabled", config.web_dir.display());
    }

    let app = build_router(task_service, &config.web_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting server on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
