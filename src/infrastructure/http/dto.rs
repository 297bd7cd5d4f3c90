use serde::{Deserialize, Serialize};

use crate::domain::entities::task::{Task, TaskDraft};

/// Task as exchanged with the web client; ids travel as strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeat: String,
}

impl TaskDto {
    pub fn into_draft(self) -> (String, TaskDraft) {
        let draft = TaskDraft {
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        };
        (self.id, draft)
    }
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            date: task.date,
            title: task.title,
            comment: task.comment,
            repeat: task.repeat,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskDto>,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NextDateQuery {
    pub now: Option<String>,
    pub date: Option<String>,
    pub repeat: Option<String>,
}
