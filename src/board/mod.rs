//! The board: column/task state, its mapping onto the task service and
//! the controller that keeps both in step.

pub mod assignee;
pub mod controller;
pub mod status_columns;
pub mod store;

pub use assignee::AssigneeSuggestion;
pub use controller::BoardController;
pub use store::{BoardStore, PendingToken, Placement};
