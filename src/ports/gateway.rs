//! Task gateway port: the remote task and user services.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::model::{StatusLabel, Task, TaskId, TaskMode, User};

/// Boxed future type alias used by [`TaskGateway`] to keep the trait dyn-compatible.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// A task as the task service stores it.
///
/// The service has no columns; `status` is the only grouping it knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Service-assigned id.
    pub id: TaskId,
    /// Id of the assigned user.
    pub assignee_id: Option<String>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Deadline.
    pub due_date: Option<NaiveDate>,
    /// Required technologies.
    pub technologies: Vec<String>,
    /// Status label (the column title).
    pub status: StatusLabel,
}

/// Payload of a create or update call.
///
/// An id equal to [`TaskId::unsaved`] creates the task, anything else
/// updates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecordInput {
    /// Task id, or the unsaved sentinel.
    pub id: TaskId,
    /// Id of the assigned user.
    pub assignee_id: Option<String>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Deadline.
    pub due_date: Option<NaiveDate>,
    /// Required technologies.
    pub technologies: Vec<String>,
    /// Target status label.
    pub status: StatusLabel,
}

impl TaskRecordInput {
    /// Encodes a task as it should be stored under `status`.
    #[must_use]
    pub fn from_task(task: &Task, status: &StatusLabel) -> Self {
        Self {
            id: task.id.clone(),
            assignee_id: task.assignee.as_ref().map(|u| u.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            technologies: task.technologies.clone(),
            status: status.clone(),
        }
    }
}

/// Weighting the assignee suggestion service applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionMode {
    /// Favour users who already master the technologies.
    Proficiency,
    /// Favour users who would learn the technologies.
    Knowledge,
}

impl SuggestionMode {
    /// Query-string value understood by the service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proficiency => "proficiency",
            Self::Knowledge => "knowledge",
        }
    }
}

impl From<TaskMode> for SuggestionMode {
    fn from(mode: TaskMode) -> Self {
        match mode {
            TaskMode::Effective => Self::Proficiency,
            TaskMode::Learning => Self::Knowledge,
        }
    }
}

/// Raw answer of the assignee suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeChoice {
    /// Id of the chosen user.
    pub user_id: String,
    /// Estimated hours for the chosen user to finish the task.
    pub hours_to_complete: f64,
    /// Free-text justification; mentions the user by raw id.
    pub reason: String,
}

/// Reads and writes tasks on the remote services.
///
/// Every method issues exactly one logical request; none retries.
pub trait TaskGateway: Send + Sync {
    /// Lists every task of every status.
    fn list_tasks(&self) -> GatewayFuture<'_, Vec<TaskRecord>>;

    /// Lists every user.
    fn list_users(&self) -> GatewayFuture<'_, Vec<User>>;

    /// Creates or updates a task and returns the stored version.
    fn save_task(&self, input: &TaskRecordInput) -> GatewayFuture<'_, TaskRecord>;

    /// Deletes a task.
    fn delete_task(&self, id: &TaskId) -> GatewayFuture<'_, ()>;

    /// Asks the service which user should take a task.
    fn suggest_assignee(
        &self,
        id: &TaskId,
        mode: SuggestionMode,
    ) -> GatewayFuture<'_, AssigneeChoice>;
}
