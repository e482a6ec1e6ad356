//! In-memory board state.
//!
//! `BoardStore` holds the ordered columns and their ordered tasks and
//! offers the mutations the board needs. It performs no I/O. Mutations
//! that must be confirmed by the task service are split in two: a
//! `begin_*` call validates the request and hands out a pending token,
//! and the matching `commit_*` call applies the server's answer. A
//! newer `begin_*` on the same task supersedes older tokens, so a late
//! confirmation for an abandoned attempt is rejected instead of
//! overwriting newer state.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::BoardError;
use crate::model::{Column, ColumnId, StatusLabel, Task, TaskDraft, TaskId};

/// Where a task goes in its destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the last task.
    End,
    /// Before the task currently at this index (clamped to the end).
    Index(usize),
}

/// Proof that an operation on a task is the latest one started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToken(u64);

/// A cross-column move waiting for the service to confirm.
#[derive(Debug, Clone)]
pub struct PendingMove {
    /// Token guarding the commit.
    pub token: PendingToken,
    /// Column the task leaves.
    pub source: ColumnId,
    /// Column the task joins.
    pub dest: ColumnId,
    /// Position in `dest`.
    pub placement: Placement,
    /// The task as held before the move.
    pub task: Task,
    /// Status the task must be stored under.
    pub status: StatusLabel,
}

/// An in-place task update waiting for the service to confirm.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    /// Token guarding the commit.
    pub token: PendingToken,
    /// Id of the task being replaced.
    pub task_id: TaskId,
    /// The task with the intended field values.
    pub task: Task,
    /// Status of the owning column.
    pub status: StatusLabel,
}

/// A new task waiting for the service to assign it an id.
#[derive(Debug, Clone)]
pub struct PendingInsert {
    /// Column receiving the task.
    pub column: ColumnId,
    /// The unsaved task.
    pub task: Task,
    /// Status of that column.
    pub status: StatusLabel,
}

/// Ordered columns of ordered tasks.
#[derive(Debug, Default)]
pub struct BoardStore {
    columns: Vec<Column>,
    pending: HashMap<TaskId, u64>,
    next_token: u64,
}

/// Moves the element at `from` so that it ends up at `to`.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), BoardError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(BoardError::IndexOutOfRange { index, len });
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

impl BoardStore {
    /// Creates a store holding the given columns.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, pending: HashMap::new(), next_token: 0 }
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by key.
    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Position of a column.
    #[must_use]
    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    /// Column by title.
    #[must_use]
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.title.as_str() == title.trim())
    }

    /// Owning column and position of a task.
    #[must_use]
    pub fn locate_task(&self, id: &TaskId) -> Option<(ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|c| c.position_of(id).map(|index| (c.id.clone(), index)))
    }

    /// Task by id.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter()).find(|t| &t.id == id)
    }

    /// Status a task is stored under, i.e. its column's title.
    #[must_use]
    pub fn status_of(&self, id: &TaskId) -> Option<&StatusLabel> {
        self.columns.iter().find(|c| c.contains(id)).map(|c| &c.title)
    }

    /// Whether an operation on the task awaits confirmation.
    #[must_use]
    pub fn is_pending(&self, id: &TaskId) -> bool {
        self.pending.contains_key(id)
    }

    fn column_mut(&mut self, id: &ColumnId) -> Result<&mut Column, BoardError> {
        self.columns
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| BoardError::ColumnNotFound(id.clone()))
    }

    fn require_column(&self, id: &ColumnId) -> Result<&Column, BoardError> {
        self.column(id).ok_or_else(|| BoardError::ColumnNotFound(id.clone()))
    }

    /// Reorders columns. Column order is never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::IndexOutOfRange`] if either index is outside the board.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), BoardError> {
        array_move(&mut self.columns, from, to)?;
        debug!(from, to, "moved column");
        Ok(())
    }

    /// Reorders the tasks of one column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] or [`BoardError::IndexOutOfRange`].
    pub fn move_task_within_column(
        &mut self,
        column: &ColumnId,
        from: usize,
        to: usize,
    ) -> Result<(), BoardError> {
        array_move(&mut self.column_mut(column)?.tasks, from, to)?;
        debug!(%column, from, to, "reordered task");
        Ok(())
    }

    fn issue_token(&mut self, task: &TaskId) -> PendingToken {
        let token = self.next_token;
        self.next_token += 1;
        if self.pending.insert(task.clone(), token).is_some() {
            debug!(%task, "superseding pending operation");
        }
        PendingToken(token)
    }

    fn redeem_token(&mut self, task: &TaskId, token: PendingToken) -> Result<(), BoardError> {
        if self.pending.get(task) != Some(&token.0) {
            warn!(%task, "ignoring stale confirmation");
            return Err(BoardError::StaleConfirmation(task.clone()));
        }
        self.pending.remove(task);
        Ok(())
    }

    /// Forgets a pending operation after the service refused it.
    ///
    /// Has no effect when a newer operation already took over the task.
    pub fn abandon(&mut self, task: &TaskId, token: PendingToken) {
        if self.pending.get(task) == Some(&token.0) {
            self.pending.remove(task);
        }
    }

    /// Starts moving a task to another column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown column or
    /// [`BoardError::TaskNotFound`] if the task is not in `source`.
    pub fn begin_move(
        &mut self,
        task: &TaskId,
        source: &ColumnId,
        dest: &ColumnId,
        placement: Placement,
    ) -> Result<PendingMove, BoardError> {
        let status = self.require_column(dest)?.title.clone();
        let snapshot = self
            .require_column(source)?
            .tasks
            .iter()
            .find(|t| &t.id == task)
            .cloned()
            .ok_or_else(|| BoardError::TaskNotFound(task.clone()))?;
        let token = self.issue_token(task);
        Ok(PendingMove {
            token,
            source: source.clone(),
            dest: dest.clone(),
            placement,
            task: snapshot,
            status,
        })
    }

    /// Applies a confirmed move, inserting the server's version of the task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StaleConfirmation`] if a newer operation took
    /// over the task, or a not-found error if the task or destination
    /// disappeared meanwhile. The board is unchanged on error.
    pub fn commit_move(&mut self, pending: PendingMove, confirmed: Task) -> Result<(), BoardError> {
        let task_id = pending.task.id.clone();
        let dest_index = self
            .column_index(&pending.dest)
            .ok_or_else(|| BoardError::ColumnNotFound(pending.dest.clone()))?;
        let (current, position) =
            self.locate_task(&task_id).ok_or_else(|| BoardError::TaskNotFound(task_id.clone()))?;
        self.redeem_token(&task_id, pending.token)?;

        self.column_mut(&current)?.tasks.remove(position);
        let tasks = &mut self.columns[dest_index].tasks;
        let at = match pending.placement {
            Placement::End => tasks.len(),
            Placement::Index(index) => index.min(tasks.len()),
        };
        tasks.insert(at, confirmed);
        debug!(task = %task_id, from = %pending.source, to = %pending.dest, at, "committed move");
        Ok(())
    }

    /// Starts replacing a task's fields with form values.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] if no column holds the task.
    pub fn begin_edit(&mut self, task: &TaskId, draft: TaskDraft) -> Result<PendingEdit, BoardError> {
        if self.task(task).is_none() {
            return Err(BoardError::TaskNotFound(task.clone()));
        }
        self.begin_update(draft.into_task(task.clone()))
    }

    /// Starts re-saving a task unchanged, e.g. after a reorder.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] if no column holds the task.
    pub fn begin_resave(&mut self, task: &TaskId) -> Result<PendingEdit, BoardError> {
        let current =
            self.task(task).cloned().ok_or_else(|| BoardError::TaskNotFound(task.clone()))?;
        self.begin_update(current)
    }

    fn begin_update(&mut self, task: Task) -> Result<PendingEdit, BoardError> {
        let status = self
            .status_of(&task.id)
            .cloned()
            .ok_or_else(|| BoardError::TaskNotFound(task.id.clone()))?;
        let token = self.issue_token(&task.id);
        Ok(PendingEdit { token, task_id: task.id.clone(), task, status })
    }

    /// Replaces the task in place with the server's version.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StaleConfirmation`] or [`BoardError::TaskNotFound`];
    /// the board is unchanged on error.
    pub fn commit_edit(&mut self, pending: PendingEdit, confirmed: Task) -> Result<(), BoardError> {
        let (column, position) = self
            .locate_task(&pending.task_id)
            .ok_or_else(|| BoardError::TaskNotFound(pending.task_id.clone()))?;
        self.redeem_token(&pending.task_id, pending.token)?;
        self.column_mut(&column)?.tasks[position] = confirmed;
        debug!(task = %pending.task_id, "committed edit");
        Ok(())
    }

    /// Starts adding a new task at the end of a column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown column.
    pub fn begin_insert(&self, column: &ColumnId, task: Task) -> Result<PendingInsert, BoardError> {
        let status = self.require_column(column)?.title.clone();
        Ok(PendingInsert { column: column.clone(), task, status })
    }

    /// Appends the server's version of a new task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] if the column disappeared meanwhile.
    pub fn commit_insert(
        &mut self,
        pending: PendingInsert,
        confirmed: Task,
    ) -> Result<(), BoardError> {
        let column = self.column_mut(&pending.column)?;
        debug!(task = %confirmed.id, column = %pending.column, "committed insert");
        column.tasks.push(confirmed);
        Ok(())
    }

    /// Removes a task from a column.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the column or task is unknown.
    pub fn remove_task(&mut self, column: &ColumnId, task: &TaskId) -> Result<Task, BoardError> {
        let column = self.column_mut(column)?;
        let position =
            column.position_of(task).ok_or_else(|| BoardError::TaskNotFound(task.clone()))?;
        let removed = column.tasks.remove(position);
        self.pending.remove(task);
        Ok(removed)
    }

    /// Appends a column.
    pub fn insert_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Removes a column and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown column.
    pub fn remove_column(&mut self, id: &ColumnId) -> Result<Column, BoardError> {
        let index = self.column_index(id).ok_or_else(|| BoardError::ColumnNotFound(id.clone()))?;
        let column = self.columns.remove(index);
        for task in &column.tasks {
            self.pending.remove(&task.id);
        }
        Ok(column)
    }

    /// Gives a column a new title and task list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown column.
    pub fn replace_column(
        &mut self,
        id: &ColumnId,
        title: StatusLabel,
        tasks: Vec<Task>,
    ) -> Result<(), BoardError> {
        let column = self.column_mut(id)?;
        column.title = title;
        column.tasks = tasks;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskMode;

    fn task(id: &str) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: "d".into(),
            due_date: None,
            assignee: None,
            technologies: vec![],
            mode: TaskMode::Effective,
        }
    }

    fn column(id: &str, title: &str, tasks: &[&str]) -> Column {
        Column {
            id: ColumnId::new(id),
            title: StatusLabel::new(title),
            tasks: tasks.iter().map(|t| task(t)).collect(),
        }
    }

    fn ids(store: &BoardStore, column: &str) -> Vec<String> {
        store.column(&ColumnId::new(column)).unwrap().tasks.iter().map(|t| t.id.to_string()).collect()
    }

    fn two_columns() -> BoardStore {
        BoardStore::new(vec![column("a", "To Do", &["t1", "t2"]), column("b", "Done", &[])])
    }

    #[test]
    fn move_column_only_changes_sequence() {
        let mut store = BoardStore::new(vec![
            column("a", "To Do", &["t1"]),
            column("b", "Doing", &["t2", "t3"]),
            column("c", "Done", &[]),
        ]);
        store.move_column(0, 2).unwrap();
        let order: Vec<&str> = store.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(ids(&store, "a"), vec!["t1"]);
        assert_eq!(ids(&store, "b"), vec!["t2", "t3"]);
    }

    #[test]
    fn move_column_rejects_out_of_range() {
        let mut store = two_columns();
        let err = store.move_column(0, 2).unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(store.columns()[0].id.as_str(), "a");
    }

    #[test]
    fn reorder_within_column_preserves_ids_for_every_pair() {
        let names = ["t1", "t2", "t3", "t4"];
        for from in 0..names.len() {
            for to in 0..names.len() {
                let mut store = BoardStore::new(vec![column("a", "To Do", &names)]);
                store.move_task_within_column(&ColumnId::new("a"), from, to).unwrap();
                let mut after = ids(&store, "a");
                assert_eq!(after[to], names[from]);
                after.sort();
                assert_eq!(after, names);
            }
        }
    }

    #[test]
    fn reorder_last_to_first() {
        let mut store = BoardStore::new(vec![column("a", "To Do", &["t1", "t2", "t3"])]);
        store.move_task_within_column(&ColumnId::new("a"), 2, 0).unwrap();
        assert_eq!(ids(&store, "a"), vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn committed_move_inserts_confirmed_task() {
        let mut store = two_columns();
        let pending = store
            .begin_move(&TaskId::new("t1"), &ColumnId::new("a"), &ColumnId::new("b"), Placement::End)
            .unwrap();
        assert_eq!(pending.status.as_str(), "Done");
        assert!(store.is_pending(&TaskId::new("t1")));

        let mut confirmed = task("t1");
        confirmed.description = "normalised by server".into();
        store.commit_move(pending, confirmed).unwrap();

        assert_eq!(ids(&store, "a"), vec!["t2"]);
        assert_eq!(ids(&store, "b"), vec!["t1"]);
        assert_eq!(store.task(&TaskId::new("t1")).unwrap().description, "normalised by server");
        assert_eq!(store.status_of(&TaskId::new("t1")).unwrap().as_str(), "Done");
        assert!(!store.is_pending(&TaskId::new("t1")));
    }

    #[test]
    fn committed_move_respects_index_placement() {
        let mut store =
            BoardStore::new(vec![column("a", "To Do", &["t1"]), column("b", "Done", &["x", "y"])]);
        let pending = store
            .begin_move(
                &TaskId::new("t1"),
                &ColumnId::new("a"),
                &ColumnId::new("b"),
                Placement::Index(1),
            )
            .unwrap();
        store.commit_move(pending, task("t1")).unwrap();
        assert_eq!(ids(&store, "b"), vec!["x", "t1", "y"]);
    }

    #[test]
    fn abandoned_move_leaves_board_untouched() {
        let mut store = two_columns();
        let pending = store
            .begin_move(&TaskId::new("t1"), &ColumnId::new("a"), &ColumnId::new("b"), Placement::End)
            .unwrap();
        store.abandon(&TaskId::new("t1"), pending.token);

        assert_eq!(ids(&store, "a"), vec!["t1", "t2"]);
        assert!(ids(&store, "b").is_empty());
        assert!(!store.is_pending(&TaskId::new("t1")));
    }

    #[test]
    fn superseded_confirmation_is_rejected() {
        let mut store = two_columns();
        let first = store
            .begin_move(&TaskId::new("t1"), &ColumnId::new("a"), &ColumnId::new("b"), Placement::End)
            .unwrap();
        let second = store.begin_resave(&TaskId::new("t1")).unwrap();

        let err = store.commit_move(first, task("t1")).unwrap_err();
        assert!(matches!(err, BoardError::StaleConfirmation(_)));
        assert_eq!(ids(&store, "a"), vec!["t1", "t2"]);

        store.commit_edit(second, task("t1")).unwrap();
        assert!(!store.is_pending(&TaskId::new("t1")));
    }

    #[test]
    fn abandon_does_not_clear_newer_token() {
        let mut store = two_columns();
        let first = store.begin_resave(&TaskId::new("t2")).unwrap();
        let second = store.begin_resave(&TaskId::new("t2")).unwrap();
        store.abandon(&TaskId::new("t2"), first.token);
        assert!(store.is_pending(&TaskId::new("t2")));
        store.commit_edit(second, task("t2")).unwrap();
    }

    #[test]
    fn begin_move_requires_task_in_source() {
        let mut store = two_columns();
        let err = store
            .begin_move(&TaskId::new("t1"), &ColumnId::new("b"), &ColumnId::new("a"), Placement::End)
            .unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound(_)));
        assert!(!store.is_pending(&TaskId::new("t1")));
    }

    #[test]
    fn edit_replaces_in_place() {
        let mut store = two_columns();
        let pending = store.begin_edit(&TaskId::new("t1"), TaskDraft::new("Renamed", "d")).unwrap();
        assert_eq!(pending.task.title, "Renamed");
        assert_eq!(pending.status.as_str(), "To Do");

        let mut confirmed = task("t1");
        confirmed.title = "Renamed".into();
        store.commit_edit(pending, confirmed).unwrap();
        assert_eq!(ids(&store, "a"), vec!["t1", "t2"]);
        assert_eq!(store.task(&TaskId::new("t1")).unwrap().title, "Renamed");
    }

    #[test]
    fn insert_appends_server_task() {
        let mut store = two_columns();
        let pending = store
            .begin_insert(&ColumnId::new("b"), Task::from_draft(TaskDraft::new("New", "d")))
            .unwrap();
        assert!(pending.task.id.is_unsaved());
        store.commit_insert(pending, task("t9")).unwrap();
        assert_eq!(ids(&store, "b"), vec!["t9"]);
    }

    #[test]
    fn remove_and_replace_columns() {
        let mut store = two_columns();
        store.remove_task(&ColumnId::new("a"), &TaskId::new("t2")).unwrap();
        assert_eq!(ids(&store, "a"), vec!["t1"]);

        store.replace_column(&ColumnId::new("b"), StatusLabel::new("Shipped"), vec![task("p")]).unwrap();
        assert!(store.column_by_title("Shipped").is_some());

        let removed = store.remove_column(&ColumnId::new("a")).unwrap();
        assert_eq!(removed.title.as_str(), "To Do");
        assert_eq!(store.columns().len(), 1);
    }
}
