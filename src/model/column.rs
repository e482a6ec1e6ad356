//! Board columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

/// Client-local key of a column.
///
/// Columns have no identity on the task service; this key only lives
/// for the lifetime of a loaded board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Wraps a column key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status value the task service stores on each task.
///
/// A column's title *is* its status label: tasks in the "Done" column
/// carry status `"Done"` remotely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLabel(String);

impl StatusLabel {
    /// Wraps a status string, trimming surrounding whitespace.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered lane of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Client-local key.
    pub id: ColumnId,
    /// Title, doubling as the remote status of every task in the column.
    pub title: StatusLabel,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

impl Column {
    /// Creates an empty column.
    #[must_use]
    pub fn new(id: ColumnId, title: StatusLabel) -> Self {
        Self { id, title, tasks: Vec::new() }
    }

    /// Position of a task in this column.
    #[must_use]
    pub fn position_of(&self, task: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == task)
    }

    /// Whether the column holds the task.
    #[must_use]
    pub fn contains(&self, task: &TaskId) -> bool {
        self.position_of(task).is_some()
    }
}
