use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params};

use crate::domain::entities::task::Task;
use crate::domain::repositories::task_repository::{RepositoryError, Result, TaskRepository};
use crate::infrastructure::database::DatabaseManager;

/// `TaskRepository` backed by the `scheduler` table
#[derive(Clone)]
pub struct SqliteTaskRepository {
    db: DatabaseManager,
}

impl SqliteTaskRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    // runs inside spawn_blocking; NULL comment/repeat read back as empty strings
    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get("id")?,
            date: row.get("date")?,
            title: row.get("title")?,
            comment: row.get::<_, Option<String>>("comment")?.unwrap_or_default(),
            repeat: row.get::<_, Option<String>>("repeat")?.unwrap_or_default(),
        })
    }
}

fn storage(e: anyhow::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{:#}", e))
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn add_task(&self, task: Task) -> Result<i64> {
        self.db
            .execute_blocking(move |conn| {
                conn.execute(
                    "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?1, ?2, ?3, ?4)",
                    params![task.date, task.title, task.comment, task.repeat],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(storage)
    }

    async fn get_task(&self, id: i64) -> Result<Task> {
        self.db
            .execute_blocking(move |conn| {
                conn.query_row(
                    "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = ?1",
                    params![id],
                    SqliteTaskRepository::row_to_task,
                )
                .optional()
            })
            .await
            .map_err(storage)?
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_tasks(&self, limit: usize) -> Result<Vec<Task>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.db
            .execute_blocking(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, date, title, comment, repeat FROM scheduler
                     ORDER BY date ASC
                     LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], SqliteTaskRepository::row_to_task)?;
                rows.collect()
            })
            .await
            .map_err(storage)
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let task = task.clone();

        let changed = self
            .db
            .execute_blocking(move |conn| {
                conn.execute(
                    "UPDATE scheduler SET date = ?2, title = ?3, comment = ?4, repeat = ?5
                     WHERE id = ?1",
                    params![task.id, task.date, task.title, task.comment, task.repeat],
                )
            })
            .await
            .map_err(storage)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<()> {
        let deleted = self
            .db
            .execute_blocking(move |conn| {
                conn.execute("DELETE FROM scheduler WHERE id = ?1", params![id])
            })
            .await
            .map_err(storage)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteTaskRepository {
        let db = DatabaseManager::in_memory().unwrap();
        db.initialize_database().await.unwrap();
        SqliteTaskRepository::new(db)
    }

    fn task(date: &str, title: &str, repeat: &str) -> Task {
        Task::new(0, date.into(), title.into(), String::new(), repeat.into())
    }

    #[tokio::test]
    async fn add_then_get() {
        let repo = repo().await;
        let id = repo.add_task(task("20250701", "Dentist", "y")).await.unwrap();

        let stored = repo.get_task(id).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.date, "20250701");
        assert_eq!(stored.title, "Dentist");
        assert_eq!(stored.repeat, "y");
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let repo = repo().await;
        assert!(matches!(repo.get_task(42).await, Err(RepositoryError::NotFound)));
        assert!(matches!(repo.delete_task(42).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            repo.update_task(&task("20250701", "ghost", "")).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_date_and_limited() {
        let repo = repo().await;
        for date in ["20250305", "20250101", "20251231", "20250601"] {
            repo.add_task(task(date, date, "")).await.unwrap();
        }

        let dates: Vec<String> = repo
            .list_tasks(3)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.date)
            .collect();
        assert_eq!(dates, vec!["20250101", "20250305", "20250601"]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let repo = repo().await;
        let id = repo.add_task(task("20250701", "Gym", "d 2")).await.unwrap();

        let mut changed = repo.get_task(id).await.unwrap();
        changed.date = "20250703".into();
        changed.comment = "legs".into();
        repo.update_task(&changed).await.unwrap();
        assert_eq!(repo.get_task(id).await.unwrap(), changed);

        repo.delete_task(id).await.unwrap();
        assert!(repo.list_tasks(50).await.unwrap().is_empty());
    }
}
