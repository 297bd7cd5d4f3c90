use crate::domain::entities::task::{Task, TaskDraft};
use crate::domain::repositories::{RepositoryError, TaskRepository};
use crate::domain::value_objects::repeat_rule::{RepeatRuleError, next_date};
use crate::domain::value_objects::task_date::{format_date, parse_date};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Maximum number of tasks returned by a listing
pub const LIST_LIMIT: usize = 50;

/// Longest repeat rule the `scheduler` table accepts
pub const MAX_REPEAT_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid RepeatRule: {0}")]
    InvalidRule(#[from] RepeatRuleError),
    #[error("task not found")]
    NotFound,
    #[error("{0}")]
    Storage(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Source of "today"; swapped out in tests to pin the date
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    clock: Clock,
}

impl TaskService {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        Self::with_clock(task_repo, Arc::new(|| Local::now().date_naive()))
    }

    pub fn with_clock(task_repo: Arc<dyn TaskRepository>, clock: Clock) -> Self {
        Self { task_repo, clock }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // === TASK CRUD ===

    pub async fn create_task(&self, mut draft: TaskDraft) -> ServiceResult<i64> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Validation("The title can not be empty".to_string()));
        }

        draft.repeat = clean_repeat(&draft.repeat)?;
        draft.date = self.normalize_date(&draft.date, &draft.repeat)?;

        let id = self.task_repo.add_task(draft.into_task(0)).await?;
        info!("Created task {}", id);
        Ok(id)
    }

    pub async fn get_task(&self, id: &str) -> ServiceResult<Task> {
        let id = parse_id(id)?;
        Ok(self.task_repo.get_task(id).await?)
    }

    /// Upcoming tasks, earliest first. Rows stored without a date are shown as due today.
    pub async fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        let today = format_date(self.today());
        let mut tasks = self.task_repo.list_tasks(LIST_LIMIT).await?;

        for task in tasks.iter_mut().filter(|t| t.date.is_empty()) {
            task.date = today.clone();
        }
        Ok(tasks)
    }

    pub async fn update_task(&self, id: &str, mut draft: TaskDraft) -> ServiceResult<()> {
        let id = parse_id(id)?;
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Validation("Title must not be empty".to_string()));
        }

        draft.repeat = clean_repeat(&draft.repeat)?;
        draft.date = self.normalize_date(&draft.date, &draft.repeat)?;

        self.task_repo.update_task(&draft.into_task(id)).await?;
        info!("Updated task {}", id);
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.task_repo.delete_task(id).await?;
        info!("Deleted task {}", id);
        Ok(())
    }

    /// Mark a task done: recurring tasks move one rule step past their own
    /// date, one-shot tasks are removed.
    pub async fn complete_task(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        let mut task = self.task_repo.get_task(id).await?;

        if !task.is_recurring() {
            self.task_repo.delete_task(id).await?;
            info!("Completed one-shot task {}, removed", id);
            return Ok(());
        }

        let current = parse_date(&task.date).ok_or(RepeatRuleError::InvalidStartDate)?;
        task.date = next_date(current, &task.date, &task.repeat)?;
        self.task_repo.update_task(&task).await?;

        info!("Completed recurring task {}, next date {}", id, task.date);
        Ok(())
    }

    // === DATE NORMALIZATION ===

    /// Decide the date a task is stored with.
    ///
    /// Blank dates become today. A repeat rule is always validated. Overdue
    /// dates become the rule's next occurrence after today, or today itself
    /// for tasks that do not repeat. A date equal to today is kept.
    pub fn normalize_date(&self, date: &str, repeat: &str) -> ServiceResult<String> {
        let today = self.today();

        let date = if date.trim().is_empty() {
            format_date(today)
        } else {
            date.to_string()
        };

        let parsed = parse_date(&date).ok_or_else(|| {
            ServiceError::Validation("invalid format `date`, must be in format 20060102".to_string())
        })?;

        let recurring = !repeat.trim().is_empty();
        if recurring {
            next_date(today, &date, repeat)?;
        }

        if parsed >= today {
            return Ok(date);
        }

        let normalized = if recurring {
            next_date(today, &date, repeat)?
        } else {
            format_date(today)
        };
        debug!("Overdue date {} moved to {}", date, normalized);
        Ok(normalized)
    }
}

/// Stored rules are trimmed and must fit the column limit.
fn clean_repeat(repeat: &str) -> ServiceResult<String> {
    let repeat = repeat.trim();
    if repeat.chars().count() > MAX_REPEAT_LEN {
        return Err(ServiceError::Validation(format!(
            "repeat rule is longer than {} characters",
            MAX_REPEAT_LEN
        )));
    }
    Ok(repeat.to_string())
}

fn parse_id(id: &str) -> ServiceResult<i64> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::Validation("Id must not be empty".to_string()));
    }
    id.parse()
        .map_err(|_| ServiceError::Validation(format!("Invalid task id: {}", id)))
}
