//! Task cards and the form values used to create or edit them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::User;
use crate::error::BoardError;

/// Identifier of a task as assigned by the task service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    const UNSAVED: &'static str = "0";

    /// Wraps a remote identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id carried by a task the service has not stored yet.
    #[must_use]
    pub fn unsaved() -> Self {
        Self(Self::UNSAVED.to_string())
    }

    /// Whether this is the not-yet-persisted sentinel.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        self.0 == Self::UNSAVED
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a task is meant to be carried out.
///
/// The mode decides which weighting the assignee suggestion uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    /// Give the task to whoever is most proficient.
    #[default]
    Effective,
    /// Give the task to someone who learns from it.
    Learning,
}

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Remote identifier, [`TaskId::unsaved`] before the first save.
    pub id: TaskId,
    /// Short title shown on the card.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Assigned user, if any.
    pub assignee: Option<User>,
    /// Required technologies, ordered, without duplicates.
    pub technologies: Vec<String>,
    /// Execution mode.
    pub mode: TaskMode,
}

impl Task {
    /// Builds a not-yet-persisted task from form values.
    #[must_use]
    pub fn from_draft(draft: TaskDraft) -> Self {
        draft.into_task(TaskId::unsaved())
    }
}

/// Field values produced by the task form, everything but the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Card title (required).
    pub title: String,
    /// Description (required).
    pub description: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Assigned user.
    pub assignee: Option<User>,
    /// Required technologies.
    pub technologies: Vec<String>,
    /// Execution mode.
    pub mode: TaskMode,
}

impl TaskDraft {
    /// Creates a draft with the two required fields set.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), ..Self::default() }
    }

    /// Sets the technologies, dropping blanks and repeats while keeping order.
    #[must_use]
    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for tech in technologies {
            let tech = tech.into().trim().to_string();
            if !tech.is_empty() && !list.contains(&tech) {
                list.push(tech);
            }
        }
        self.technologies = list;
        self
    }

    /// Pre-fills a draft from an existing task, as the edit form does.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            assignee: task.assignee.clone(),
            technologies: task.technologies.clone(),
            mode: task.mode,
        }
    }

    /// Rejects drafts with a blank title or description.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.title.trim().is_empty() {
            return Err(BoardError::MissingField { field: "title" });
        }
        if self.description.trim().is_empty() {
            return Err(BoardError::MissingField { field: "description" });
        }
        Ok(())
    }

    /// Attaches the form values to an id.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            due_date: self.due_date,
            assignee: self.assignee,
            technologies: self.technologies,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsaved_sentinel_is_zero() {
        assert!(TaskId::unsaved().is_unsaved());
        assert_eq!(TaskId::unsaved().as_str(), "0");
        assert!(!TaskId::new("17").is_unsaved());
    }

    #[test]
    fn blank_title_fails_validation() {
        let err = TaskDraft::new("   ", "body").validate().unwrap_err();
        assert!(matches!(err, BoardError::MissingField { field: "title" }));
    }

    #[test]
    fn blank_description_fails_validation() {
        let err = TaskDraft::new("Title", "").validate().unwrap_err();
        assert!(matches!(err, BoardError::MissingField { field: "description" }));
    }

    #[test]
    fn technologies_are_an_ordered_set() {
        let draft = TaskDraft::new("t", "d").with_technologies(["Rust", "SQL", "Rust", " ", "Docker"]);
        assert_eq!(draft.technologies, vec!["Rust", "SQL", "Docker"]);
    }

    #[test]
    fn into_task_trims_title() {
        let task = TaskDraft::new("  Ship it ", "d").into_task(TaskId::new("5"));
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.id, TaskId::new("5"));
    }
}
