use chrono::{DateTime, Utc};

pub type TaskId = i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
}

impl Task {
    // Build a not-yet-completed task
    pub fn new(id: TaskId, description: impl Into<String>, due_date: DateTime<Utc>) -> Task {
        Task {
            id,
            description: description.into(),
            completed: false,
            due_date,
        }
    }
}
