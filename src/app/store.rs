// In-memory task store
// Philosophy of CRUD lives here: every mutation of the task collection goes through TodoStore
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::app::message::Confirmation;
use crate::app::models::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Task with ID {id} not found.")]
    NotFound { id: TaskId },
    #[error("No task IDs left to assign.")]
    IdSpaceExhausted,
}

#[derive(Debug)]
pub struct TodoStore {
    items: Vec<Task>,
    // Wider than TaskId so a seed at TaskId::MAX still has a successor
    next_id: i64,
}

impl Default for TodoStore {
    fn default() -> TodoStore {
        TodoStore::new(Vec::new())
    }
}

impl TodoStore {
    // Seed ids are taken as-is, duplicates included; lookups act on the first match.
    // Next id is one past the largest seed id, or 1 for an empty seed.
    pub fn new(seed: Vec<Task>) -> TodoStore {
        let next_id = seed
            .iter()
            .map(|task| i64::from(task.id))
            .max()
            .map_or(1, |max| max + 1);
        debug!(seeded = seed.len(), next_id, "task store created");
        TodoStore {
            items: seed,
            next_id,
        }
    }

    // CREATE
    pub fn add(
        &mut self,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Confirmation, StoreError> {
        let id = TaskId::try_from(self.next_id).map_err(|_| StoreError::IdSpaceExhausted)?;
        self.next_id += 1;

        let task = Task::new(id, description, due_date);
        debug!(id, description = %task.description, due_date = %task.due_date, "task added");
        let confirmation = Confirmation::Added {
            id,
            description: task.description.clone(),
        };
        self.items.push(task);
        Ok(confirmation)
    }

    // READ
    pub fn list(&self) -> &[Task] {
        &self.items
    }

    pub fn filter_by_completion(&self, completed: bool) -> Vec<&Task> {
        self.items
            .iter()
            .filter(|task| task.completed == completed)
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Id the next added task will receive
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    // UPDATE
    pub fn complete(&mut self, id: TaskId) -> Result<Confirmation, StoreError> {
        let task = self.find_mut(id)?;
        task.completed = true;
        debug!(id, "task completed");
        Ok(Confirmation::Completed {
            id,
            description: task.description.clone(),
        })
    }

    pub fn update_description(
        &mut self,
        id: TaskId,
        new_description: impl Into<String>,
    ) -> Result<Confirmation, StoreError> {
        let task = self.find_mut(id)?;
        task.description = new_description.into();
        debug!(id, description = %task.description, "task description updated");
        Ok(Confirmation::Updated {
            id,
            description: task.description.clone(),
        })
    }

    // DELETE
    pub fn remove(&mut self, id: TaskId) -> Result<Confirmation, StoreError> {
        let index = self
            .items
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let task = self.items.remove(index);
        debug!(id, remaining = self.items.len(), "task removed");
        Ok(Confirmation::Removed { task })
    }

    pub fn clear_completed(&mut self) -> Confirmation {
        let before = self.items.len();
        self.items.retain(|task| !task.completed);
        let removed = before - self.items.len();
        debug!(removed, "completed tasks cleared");
        Confirmation::ClearedCompleted { removed }
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.items
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound { id })
    }
}
