use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::{debug, info};

/// Primary manager for SQLite database operations; provides async-friendly access to synchronous rusqlite connections using tokio's spawn_blocking.
#[derive(Clone)]
pub struct DatabaseManager {
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseManager {
    /// Open (or create) the database file and configure it for concurrent readers.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let connection = Connection::open(db_path)
            .with_context(|| format!("Failed to open SQLite database at {}", db_path.display()))?;

        connection
            .execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
            .context("Failed to configure SQLite pragmas")?;
        debug!("Opened SQLite database at {}", db_path.display());

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Execute a blocking database operation in a tokio-aware manner; moves the operation to a blocking thread pool to avoid blocking the async runtime.
    pub async fn execute_blocking<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = connection
                .lock()
                .map_err(|_| anyhow!("Database connection mutex poisoned"))?;
            operation(&conn).context("Database operation failed")
        })
        .await
        .context("Failed to execute blocking database operation - task join error")?
    }

    /// Create tables and indexes from schema.sql; safe to run on every start.
    pub async fn initialize_database(&self) -> Result<()> {
        let schema = include_str!("schema.sql");

        self.execute_blocking(move |connection| connection.execute_batch(schema))
            .await
            .context("Failed to apply database schema")?;

        info!("Database schema ready");
        Ok(())
    }
}
