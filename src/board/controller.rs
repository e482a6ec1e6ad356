//! Board controller: applies gestures and form results to the board,
//! persisting each change before committing it locally.
//!
//! Every mutation with a remote counterpart follows the same steps:
//! validate and compute the intended change, issue exactly one remote
//! call, then commit the server's answer into the store. A failed call
//! leaves the store as it was and surfaces [`BoardError::Remote`].
//! Nothing is retried.

use tracing::{error, info, warn};

use super::assignee::AssigneeSuggestion;
use super::status_columns::{
    check_status, ensure_not_reserved, group_by_status, placeholder_task, resolve_task,
};
use super::store::{BoardStore, Placement};
use crate::config::BoardOptions;
use crate::context::ServiceContext;
use crate::drag::{DragEnd, DragItem, DragSession, DropPlan};
use crate::error::BoardError;
use crate::model::{Column, ColumnId, StatusLabel, Task, TaskDraft, TaskId, TaskMode, User};
use crate::ports::{SuggestionMode, TaskRecordInput};

/// Drives a loaded board against the remote services.
pub struct BoardController<'a> {
    ctx: &'a ServiceContext,
    store: BoardStore,
    drag: DragSession,
    users: Vec<User>,
    options: BoardOptions,
}

impl<'a> BoardController<'a> {
    /// Loads every task and user and groups the tasks into columns.
    ///
    /// A failing user list is logged and leaves the board without users.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Remote`] if the tasks cannot be listed.
    pub async fn load(ctx: &'a ServiceContext, options: BoardOptions) -> Result<Self, BoardError> {
        let records = ctx.gateway.list_tasks().await.map_err(|e| {
            error!(error = %e, "failed to load tasks");
            BoardError::remote("load tasks", e)
        })?;
        let mut controller = Self::new(ctx, BoardStore::default(), Vec::new(), options);
        controller.refresh_users().await;
        let columns = group_by_status(records, &controller.users);
        info!(columns = columns.len(), "board loaded");
        controller.store = BoardStore::new(columns);
        Ok(controller)
    }

    /// Wraps an already built store.
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        store: BoardStore,
        users: Vec<User>,
        options: BoardOptions,
    ) -> Self {
        Self { ctx, store, drag: DragSession::new(), users, options }
    }

    /// The board state.
    #[must_use]
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Users known to the board.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The drag session.
    #[must_use]
    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Re-fetches the user list. Failures are logged and ignored.
    pub async fn refresh_users(&mut self) {
        match self.ctx.gateway.list_users().await {
            Ok(users) => self.users = users,
            Err(e) => warn!(error = %e, "failed to refresh users"),
        }
    }

    /// Starts dragging an item.
    pub fn drag_start(&mut self, item: &DragItem) {
        self.drag.start(item, &self.store);
    }

    /// Ends a drag and applies the resulting plan.
    ///
    /// # Errors
    ///
    /// Returns the error of the move or reorder the drop resolved to.
    pub async fn drag_end(&mut self, event: &DragEnd) -> Result<DropPlan, BoardError> {
        let plan = self.drag.end(event, &self.store);
        match &plan {
            DropPlan::None => {}
            DropPlan::MoveColumn { from, to } => self.store.move_column(*from, *to)?,
            DropPlan::ReorderTask { column, from, to } => {
                self.reorder_task(column, *from, *to).await?;
            }
            DropPlan::MoveTask { task, source, dest, placement } => {
                self.move_task(task, source, dest, *placement).await?;
            }
        }
        Ok(plan)
    }

    /// Reorders a task inside its column, persisting it only when
    /// [`BoardOptions::persist_reorder`] is set.
    ///
    /// # Errors
    ///
    /// Returns a not-found or range error, or [`BoardError::Remote`] when
    /// the re-save fails. The column is unchanged on error.
    pub async fn reorder_task(
        &mut self,
        column: &ColumnId,
        from: usize,
        to: usize,
    ) -> Result<(), BoardError> {
        if !self.options.persist_reorder {
            return self.store.move_task_within_column(column, from, to);
        }
        let len = self
            .store
            .column(column)
            .map(|c| c.tasks.len())
            .ok_or_else(|| BoardError::ColumnNotFound(column.clone()))?;
        if from >= len || to >= len {
            return Err(BoardError::IndexOutOfRange { index: from.max(to), len });
        }
        let task_id = self.store.column(column).map(|c| c.tasks[from].id.clone());
        let task_id = task_id.ok_or_else(|| BoardError::ColumnNotFound(column.clone()))?;

        let ctx = self.ctx;
        let pending = self.store.begin_resave(&task_id)?;
        let input = TaskRecordInput::from_task(&pending.task, &pending.status);
        match ctx.gateway.save_task(&input).await {
            Ok(record) => {
                check_status(&record, &pending.status);
                let confirmed = resolve_task(record, &self.users, Some(&pending.task));
                self.store.commit_edit(pending, confirmed)?;
                self.store.move_task_within_column(column, from, to)?;
                info!(task = %task_id, %column, from, to, "reorder persisted");
                Ok(())
            }
            Err(e) => {
                error!(task = %task_id, error = %e, "failed to persist reorder");
                self.store.abandon(&task_id, pending.token);
                Err(BoardError::remote("reorder task", e))
            }
        }
    }

    /// Moves a task to another column, storing it under the destination's status.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown ids, [`BoardError::Remote`] if
    /// the save fails (the task stays in `source`) or
    /// [`BoardError::StaleConfirmation`] if a newer operation took over.
    pub async fn move_task(
        &mut self,
        task: &TaskId,
        source: &ColumnId,
        dest: &ColumnId,
        placement: Placement,
    ) -> Result<(), BoardError> {
        let ctx = self.ctx;
        let pending = self.store.begin_move(task, source, dest, placement)?;
        let input = TaskRecordInput::from_task(&pending.task, &pending.status);
        match ctx.gateway.save_task(&input).await {
            Ok(record) => {
                check_status(&record, &pending.status);
                let confirmed = resolve_task(record, &self.users, Some(&pending.task));
                let status = pending.status.clone();
                self.store.commit_move(pending, confirmed)?;
                info!(%task, %source, %dest, %status, "task moved");
                Ok(())
            }
            Err(e) => {
                error!(%task, %source, %dest, error = %e, "failed to move task");
                self.store.abandon(task, pending.token);
                Err(BoardError::remote("move task", e))
            }
        }
    }

    /// Creates a task at the end of a column and returns its service id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or reserved fields (nothing is
    /// sent), [`BoardError::ColumnNotFound`] or [`BoardError::Remote`].
    pub async fn create_task(
        &mut self,
        column: &ColumnId,
        draft: TaskDraft,
    ) -> Result<TaskId, BoardError> {
        validate_draft(&draft)?;
        let ctx = self.ctx;
        let pending = self.store.begin_insert(column, Task::from_draft(draft))?;
        let input = TaskRecordInput::from_task(&pending.task, &pending.status);
        match ctx.gateway.save_task(&input).await {
            Ok(record) => {
                check_status(&record, &pending.status);
                let confirmed = resolve_task(record, &self.users, Some(&pending.task));
                let id = confirmed.id.clone();
                self.store.commit_insert(pending, confirmed)?;
                info!(task = %id, %column, "task created");
                Ok(id)
            }
            Err(e) => {
                error!(%column, error = %e, "failed to create task");
                Err(BoardError::remote("create task", e))
            }
        }
    }

    /// Replaces a task's fields with the form values, keeping its column.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing is sent), a not-found error,
    /// [`BoardError::Remote`] or [`BoardError::StaleConfirmation`].
    pub async fn edit_task(&mut self, task: &TaskId, draft: TaskDraft) -> Result<(), BoardError> {
        validate_draft(&draft)?;
        let ctx = self.ctx;
        let pending = self.store.begin_edit(task, draft)?;
        let input = TaskRecordInput::from_task(&pending.task, &pending.status);
        match ctx.gateway.save_task(&input).await {
            Ok(record) => {
                check_status(&record, &pending.status);
                let confirmed = resolve_task(record, &self.users, Some(&pending.task));
                self.store.commit_edit(pending, confirmed)?;
                info!(%task, "task updated");
                Ok(())
            }
            Err(e) => {
                error!(%task, error = %e, "failed to update task");
                self.store.abandon(task, pending.token);
                Err(BoardError::remote("update task", e))
            }
        }
    }

    /// Deletes a task remotely, then removes it from its column.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the task is not in `column`, or
    /// [`BoardError::Remote`] (the task stays on the board).
    pub async fn delete_task(&mut self, column: &ColumnId, task: &TaskId) -> Result<(), BoardError> {
        let held = self
            .store
            .column(column)
            .ok_or_else(|| BoardError::ColumnNotFound(column.clone()))?
            .contains(task);
        if !held {
            return Err(BoardError::TaskNotFound(task.clone()));
        }
        if let Err(e) = self.ctx.gateway.delete_task(task).await {
            error!(%task, error = %e, "failed to delete task");
            return Err(BoardError::remote("delete task", e));
        }
        self.store.remove_task(column, task)?;
        info!(%task, %column, "task deleted");
        Ok(())
    }

    /// Creates an empty column by storing a placeholder task under its title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingField`] or [`BoardError::DuplicateColumn`]
    /// (nothing is sent), or [`BoardError::Remote`].
    pub async fn create_column(&mut self, title: &str) -> Result<ColumnId, BoardError> {
        let label = self.check_column_title(title, None)?;
        let input = TaskRecordInput::from_task(&placeholder_task(), &label);
        let record = self.ctx.gateway.save_task(&input).await.map_err(|e| {
            error!(column = %label, error = %e, "failed to create column");
            BoardError::remote("create column", e)
        })?;
        check_status(&record, &label);

        let id = ColumnId::new(self.ctx.id_gen.generate_id());
        let mut column = Column::new(id.clone(), label);
        column.tasks.push(resolve_task(record, &self.users, None));
        info!(column = %id, title = %column.title, "column created");
        self.store.insert_column(column);
        Ok(id)
    }

    /// Renames a column that holds no real tasks.
    ///
    /// Its placeholders are re-stored under the new title; a column
    /// without one gets a fresh placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotEmpty`] or a title validation error
    /// (nothing is sent), [`BoardError::ColumnNotFound`] or
    /// [`BoardError::Remote`]. When a later placeholder fails, the ones
    /// already stored under the new title move to a new column with that
    /// title and the rest keep the old one.
    pub async fn rename_column(&mut self, id: &ColumnId, title: &str) -> Result<(), BoardError> {
        let column = self.require_empty(id)?;
        let label = self.check_column_title(title, Some(id))?;
        if label == column.title {
            return Ok(());
        }
        let mut placeholders: Vec<Task> = column.placeholders().cloned().collect();
        if placeholders.is_empty() {
            placeholders.push(placeholder_task());
        }

        let mut confirmed = Vec::with_capacity(placeholders.len());
        for (done, placeholder) in placeholders.iter().enumerate() {
            let input = TaskRecordInput::from_task(placeholder, &label);
            match self.ctx.gateway.save_task(&input).await {
                Ok(record) => {
                    check_status(&record, &label);
                    confirmed.push(resolve_task(record, &self.users, Some(placeholder)));
                }
                Err(e) => {
                    error!(column = %id, title = %label, error = %e, "failed to rename column");
                    if !confirmed.is_empty() {
                        self.split_column(id, &placeholders[done..], label, confirmed)?;
                    }
                    return Err(BoardError::remote("rename column", e));
                }
            }
        }

        info!(column = %id, title = %label, "column renamed");
        self.store.replace_column(id, label, confirmed)
    }

    /// Leaves `id` with the placeholders still on its old title and
    /// appends a column holding the ones already renamed.
    fn split_column(
        &mut self,
        id: &ColumnId,
        remaining: &[Task],
        renamed_to: StatusLabel,
        renamed: Vec<Task>,
    ) -> Result<(), BoardError> {
        let old_title = self
            .store
            .column(id)
            .ok_or_else(|| BoardError::ColumnNotFound(id.clone()))?
            .title
            .clone();
        self.store.replace_column(id, old_title, remaining.to_vec())?;
        let split = ColumnId::new(self.ctx.id_gen.generate_id());
        warn!(column = %id, %split, title = %renamed_to, "rename stopped halfway, column split");
        let mut column = Column::new(split, renamed_to);
        column.tasks = renamed;
        self.store.insert_column(column);
        Ok(())
    }

    /// Deletes a column that holds no real tasks, placeholders first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotEmpty`] (nothing is sent),
    /// [`BoardError::ColumnNotFound`] or [`BoardError::Remote`]. On a
    /// remote failure, placeholders already deleted leave the column.
    pub async fn delete_column(&mut self, id: &ColumnId) -> Result<(), BoardError> {
        let placeholders: Vec<TaskId> =
            self.require_empty(id)?.placeholders().map(|t| t.id.clone()).collect();
        for task in &placeholders {
            if !task.is_unsaved() {
                if let Err(e) = self.ctx.gateway.delete_task(task).await {
                    error!(column = %id, %task, error = %e, "failed to delete column");
                    return Err(BoardError::remote("delete column", e));
                }
            }
            self.store.remove_task(id, task)?;
        }
        let column = self.store.remove_column(id)?;
        info!(column = %id, title = %column.title, "column deleted");
        Ok(())
    }

    /// Asks the service who should take a saved task.
    ///
    /// The user list is refreshed first so the suggestion can be shown
    /// with a display name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotPersisted`] for an unsaved task (nothing
    /// is sent), [`BoardError::Remote`] or [`BoardError::UnknownUser`].
    pub async fn suggest_assignee(
        &mut self,
        task: &TaskId,
        mode: TaskMode,
    ) -> Result<AssigneeSuggestion, BoardError> {
        if task.is_unsaved() {
            warn!("suggestion requested for an unsaved task");
            return Err(BoardError::TaskNotPersisted(task.clone()));
        }
        self.refresh_users().await;
        let choice = self
            .ctx
            .gateway
            .suggest_assignee(task, SuggestionMode::from(mode))
            .await
            .map_err(|e| {
                error!(%task, error = %e, "failed to get assignee suggestion");
                BoardError::remote("suggest assignee", e)
            })?;
        let suggestion = AssigneeSuggestion::resolve(choice, &self.users).inspect_err(|e| {
            error!(%task, error = %e, "suggestion names an unknown user");
        })?;
        info!(%task, user = %suggestion.user.id, "assignee suggested");
        Ok(suggestion)
    }

    fn require_empty(&self, id: &ColumnId) -> Result<&Column, BoardError> {
        let column = self.store.column(id).ok_or_else(|| BoardError::ColumnNotFound(id.clone()))?;
        let count = column.real_task_count();
        if count > 0 {
            warn!(column = %id, title = %column.title, count, "column still holds tasks");
            return Err(BoardError::ColumnNotEmpty { title: column.title.to_string(), count });
        }
        Ok(column)
    }

    fn check_column_title(
        &self,
        title: &str,
        renaming: Option<&ColumnId>,
    ) -> Result<StatusLabel, BoardError> {
        let label = StatusLabel::new(title);
        if label.is_blank() {
            warn!("column title is blank");
            return Err(BoardError::MissingField { field: "title" });
        }
        if let Some(existing) = self.store.column_by_title(label.as_str()) {
            if Some(&existing.id) != renaming {
                warn!(title = %label, "column title already in use");
                return Err(BoardError::DuplicateColumn(label.to_string()));
            }
        }
        Ok(label)
    }
}

fn validate_draft(draft: &TaskDraft) -> Result<(), BoardError> {
    draft
        .validate()
        .and_then(|()| ensure_not_reserved(&draft.title))
        .inspect_err(|e| warn!(error = %e, "task form rejected"))
}
