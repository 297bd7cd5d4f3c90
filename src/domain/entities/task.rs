use serde::{Deserialize, Serialize};

/// A stored task. `date` is kept in the compact `YYYYMMDD` form and `repeat`
/// holds the raw rule text (empty when the task does not recur).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl Task {
    pub fn new(id: i64, date: String, title: String, comment: String, repeat: String) -> Self {
        Self {
            id,
            date,
            title,
            comment,
            repeat,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !self.repeat.trim().is_empty()
    }
}

/// Task fields as submitted by a client, before the date is normalized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl TaskDraft {
    pub fn into_task(self, id: i64) -> Task {
        Task::new(id, self.date, self.title, self.comment, self.repeat)
    }
}
