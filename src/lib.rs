pub mod app;
pub mod config;

pub use app::message::{render, Confirmation};
pub use app::models::{Task, TaskId};
pub use app::store::{StoreError, TodoStore};
