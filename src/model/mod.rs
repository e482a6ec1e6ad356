//! Board data model: tasks, columns and the users they reference.

pub mod column;
pub mod task;
pub mod user;

pub use column::{Column, ColumnId, StatusLabel};
pub use task::{Task, TaskDraft, TaskId, TaskMode};
pub use user::User;
