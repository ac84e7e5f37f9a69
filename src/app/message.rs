// Outcomes of store operations and their human readable rendering.
// The store reports what happened; turning that into text happens here.
use std::fmt;

use crate::app::models::{Task, TaskId};
use crate::app::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Added { id: TaskId, description: String },
    Completed { id: TaskId, description: String },
    Removed { task: Task },
    Updated { id: TaskId, description: String },
    ClearedCompleted { removed: usize },
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::Added { description, .. } => {
                write!(f, "Task '{description}' added successfully!")
            }
            Confirmation::Completed { description, .. } => {
                write!(f, "Task '{description}' marked as completed.")
            }
            Confirmation::Removed { task } => {
                write!(f, "Task '{}' removed successfully.", task.description)
            }
            Confirmation::Updated { id, description } => {
                write!(f, "Task {id} updated to '{description}'.")
            }
            // Same text no matter how many were removed
            Confirmation::ClearedCompleted { .. } => {
                write!(f, "All completed tasks have been cleared.")
            }
        }
    }
}

// Render either arm of an operation result
pub fn render(outcome: &Result<Confirmation, StoreError>) -> String {
    match outcome {
        Ok(confirmation) => confirmation.to_string(),
        Err(error) => error.to_string(),
    }
}
