use dotenvy::dotenv;
mod application;
mod domain;
mod infrastructure;
mod utils;

use crate::application::services::TaskService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::DatabaseManager;
use crate::infrastructure::http::run_server;
use crate::infrastructure::repositories::SqliteTaskRepository;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    utils::setup_logging(config.log_level);

    info!("Using database file: {}", config.db_file.display());
    let db = DatabaseManager::new(&config.db_file)?;
    db.initialize_database().await?;

    let task_repo = Arc::new(SqliteTaskRepository::new(db));
    let task_service = Arc::new(TaskService::new(task_repo));

    run_server(&config, task_service).await
}
