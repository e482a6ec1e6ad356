//! Mapping between the status-based task service and board columns.
//!
//! The task service has no column entity. A column exists remotely only
//! as long as some task carries its title as status, so an empty column
//! is kept alive by a placeholder task. Everything that knows about that
//! placeholder lives in this module.

use tracing::warn;

use crate::error::BoardError;
use crate::model::user::find_user;
use crate::model::{Column, ColumnId, StatusLabel, Task, TaskId, TaskMode, User};
use crate::ports::TaskRecord;

/// Title of the placeholder task.
pub const PLACEHOLDER_TITLE: &str = "__init__";
/// Description of the placeholder task.
pub const PLACEHOLDER_DESCRIPTION: &str = "_";

/// Whether a task is a column placeholder rather than a real card.
#[must_use]
pub fn is_placeholder(task: &Task) -> bool {
    task.title == PLACEHOLDER_TITLE
}

/// A fresh, unsaved placeholder task.
#[must_use]
pub fn placeholder_task() -> Task {
    Task {
        id: TaskId::unsaved(),
        title: PLACEHOLDER_TITLE.to_string(),
        description: PLACEHOLDER_DESCRIPTION.to_string(),
        due_date: None,
        assignee: None,
        technologies: Vec::new(),
        mode: TaskMode::default(),
    }
}

/// Rejects task titles that would be mistaken for a placeholder.
///
/// # Errors
///
/// Returns [`BoardError::ReservedTitle`] for the placeholder title.
pub fn ensure_not_reserved(title: &str) -> Result<(), BoardError> {
    if title.trim() == PLACEHOLDER_TITLE {
        return Err(BoardError::ReservedTitle(title.trim().to_string()));
    }
    Ok(())
}

impl Column {
    /// Real cards, placeholders excluded.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !is_placeholder(t))
    }

    /// Number of real cards.
    #[must_use]
    pub fn real_task_count(&self) -> usize {
        self.visible_tasks().count()
    }

    /// Placeholder tasks keeping this column alive remotely.
    pub fn placeholders(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| is_placeholder(t))
    }
}

/// Groups remote task records into columns keyed by status.
///
/// Columns appear in the order their status is first seen; tasks keep
/// their order within a status. Columns are keyed `"0"`, `"1"`, ….
#[must_use]
pub fn group_by_status(records: Vec<TaskRecord>, users: &[User]) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    for record in records {
        let position = columns.iter().position(|c| c.title == record.status);
        let index = position.unwrap_or_else(|| {
            let id = ColumnId::new(columns.len().to_string());
            columns.push(Column::new(id, record.status.clone()));
            columns.len() - 1
        });
        let task = resolve_task(record, users, None);
        columns[index].tasks.push(task);
    }
    columns
}

/// Turns a server record into a board task.
///
/// The service stores neither the mode nor the user details: the mode is
/// taken from `local`, and the assignee is looked up in `users`, falling
/// back to the locally held user with the same id.
#[must_use]
pub fn resolve_task(record: TaskRecord, users: &[User], local: Option<&Task>) -> Task {
    let assignee = record.assignee_id.as_deref().and_then(|id| {
        let found = find_user(users, id)
            .cloned()
            .or_else(|| local.and_then(|t| t.assignee.clone()).filter(|u| u.id == id));
        if found.is_none() {
            warn!(task = %record.id, user = id, "assignee not found in user list");
        }
        found
    });

    Task {
        id: record.id,
        title: record.title,
        description: record.description,
        due_date: record.due_date,
        assignee,
        technologies: record.technologies,
        mode: local.map(|t| t.mode).unwrap_or_default(),
    }
}

/// Logs a server record stored under another status than requested.
pub(crate) fn check_status(record: &TaskRecord, expected: &StatusLabel) {
    if &record.status != expected {
        warn!(
            task = %record.id,
            expected = %expected,
            actual = %record.status,
            "service stored a different status than requested"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, status: &str, user: Option<&str>) -> TaskRecord {
        TaskRecord {
            id: TaskId::new(id),
            assignee_id: user.map(str::to_string),
            title: title.into(),
            description: "d".into(),
            due_date: None,
            technologies: vec![],
            status: StatusLabel::new(status),
        }
    }

    fn ana() -> User {
        User { id: "u1".into(), name: "Ana Lima".into(), email: "ana@x.io".into() }
    }

    #[test]
    fn groups_in_first_seen_status_order() {
        let columns = group_by_status(
            vec![
                record("1", "a", "Doing", None),
                record("2", "b", "To Do", None),
                record("3", "c", "Doing", None),
            ],
            &[],
        );
        let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Doing", "To Do"]);
        assert_eq!(columns[0].id.as_str(), "0");
        assert_eq!(columns[1].id.as_str(), "1");
        let ids: Vec<&str> = columns[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn resolves_assignees_against_user_list() {
        let columns = group_by_status(
            vec![record("1", "a", "Done", Some("u1")), record("2", "b", "Done", Some("ghost"))],
            &[ana()],
        );
        assert_eq!(columns[0].tasks[0].assignee.as_ref().map(|u| u.name.as_str()), Some("Ana Lima"));
        assert!(columns[0].tasks[1].assignee.is_none());
    }

    #[test]
    fn resolve_keeps_local_mode_and_known_assignee() {
        let mut local = placeholder_task();
        local.mode = TaskMode::Learning;
        local.assignee = Some(ana());

        let task = resolve_task(record("8", "t", "Done", Some("u1")), &[], Some(&local));
        assert_eq!(task.mode, TaskMode::Learning);
        assert_eq!(task.assignee, Some(ana()));
    }

    #[test]
    fn placeholders_are_hidden_from_visible_tasks() {
        let columns = group_by_status(
            vec![record("1", PLACEHOLDER_TITLE, "Review", None), record("2", "real", "Review", None)],
            &[],
        );
        assert_eq!(columns[0].real_task_count(), 1);
        assert_eq!(columns[0].placeholders().count(), 1);
        assert_eq!(columns[0].visible_tasks().next().map(|t| t.title.as_str()), Some("real"));
    }

    #[test]
    fn reserved_title_is_rejected() {
        assert!(matches!(ensure_not_reserved(" __init__ "), Err(BoardError::ReservedTitle(_))));
        assert!(ensure_not_reserved("Init the repo").is_ok());
    }
}
