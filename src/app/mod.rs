pub mod message;
pub mod models;
pub mod store;
pub mod task_edit;
pub mod task_list;
pub mod ui;
