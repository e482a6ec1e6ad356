//! Drag session: turns drag gestures into board mutations.
//!
//! Every draggable carries a [`DragItem`] and every drop zone a
//! [`DropTarget`]. A [`DragSession`] tracks what is being dragged
//! between `start` and `end`, and `end` resolves the gesture into a
//! [`DropPlan`] against the current board. The session never touches the
//! board itself; the caller applies the plan.

use std::mem;

use tracing::debug;

use crate::board::status_columns::is_placeholder;
use crate::board::{BoardStore, Placement};
use crate::model::{Column, ColumnId, Task, TaskId};

/// What a draggable element is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    /// A task card, with the column it was rendered in.
    Task {
        /// Dragged task.
        id: TaskId,
        /// Column the card was rendered in.
        column: ColumnId,
    },
    /// A whole column.
    Column {
        /// Dragged column.
        id: ColumnId,
    },
}

/// What the pointer was over when the drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Hovering a task card.
    Task {
        /// Hovered task.
        id: TaskId,
    },
    /// Hovering a column body or header.
    Column {
        /// Hovered column.
        id: ColumnId,
    },
}

/// End-of-gesture event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    /// The dragged item.
    pub active: DragItem,
    /// The drop target, absent when the gesture was cancelled.
    pub over: Option<DropTarget>,
}

/// Object being dragged, cached for overlay rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveItem {
    /// A task card.
    Task(Task),
    /// A column with its tasks.
    Column(Column),
}

/// State of a drag session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// A task or a column is being dragged.
    Dragging(ActiveItem),
}

/// Board change resolved from a finished drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Nothing to do.
    None,
    /// Reorder columns (local only).
    MoveColumn {
        /// Current index of the dragged column.
        from: usize,
        /// Index it should end up at.
        to: usize,
    },
    /// Reorder tasks inside one column.
    ReorderTask {
        /// Column being reordered.
        column: ColumnId,
        /// Current index of the dragged task.
        from: usize,
        /// Index it should end up at.
        to: usize,
    },
    /// Move a task to another column (persisted).
    MoveTask {
        /// Dragged task.
        task: TaskId,
        /// Column it currently sits in.
        source: ColumnId,
        /// Column it is dropped on.
        dest: ColumnId,
        /// Position in `dest`.
        placement: Placement,
    },
}

/// Tracks the item being dragged between drag start and drag end.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether no drag is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Starts dragging `item`.
    ///
    /// Unknown ids and placeholder tasks leave the session idle.
    pub fn start(&mut self, item: &DragItem, store: &BoardStore) {
        let active = match item {
            DragItem::Task { id, .. } => {
                store.task(id).filter(|t| !is_placeholder(t)).cloned().map(ActiveItem::Task)
            }
            DragItem::Column { id } => store.column(id).cloned().map(ActiveItem::Column),
        };
        match active {
            Some(active) => {
                debug!(?item, "drag started");
                self.state = DragState::Dragging(active);
            }
            None => {
                debug!(?item, "ignoring drag of unknown item");
                self.state = DragState::Idle;
            }
        }
    }

    /// Ends the drag and resolves what should change.
    ///
    /// The session is idle afterwards whatever the outcome. A drag whose
    /// start was refused, or that names another item than the one
    /// started, resolves to [`DropPlan::None`].
    pub fn end(&mut self, event: &DragEnd, store: &BoardStore) -> DropPlan {
        let previous = mem::take(&mut self.state);
        if !was_started(&previous, &event.active) {
            debug!(active = ?event.active, "drag ended without a matching start");
            return DropPlan::None;
        }
        let plan = resolve(event, store);
        debug!(?plan, "drag ended");
        plan
    }
}

fn was_started(previous: &DragState, active: &DragItem) -> bool {
    match (previous, active) {
        (DragState::Dragging(ActiveItem::Task(task)), DragItem::Task { id, .. }) => {
            &task.id == id && !is_placeholder(task)
        }
        (DragState::Dragging(ActiveItem::Column(column)), DragItem::Column { id }) => {
            &column.id == id
        }
        _ => false,
    }
}

fn resolve(event: &DragEnd, store: &BoardStore) -> DropPlan {
    let Some(over) = &event.over else {
        return DropPlan::None;
    };
    match (&event.active, over) {
        (DragItem::Column { id: active }, DropTarget::Column { id: over }) => {
            match (store.column_index(active), store.column_index(over)) {
                (Some(from), Some(to)) if from != to => DropPlan::MoveColumn { from, to },
                _ => DropPlan::None,
            }
        }
        (DragItem::Task { id, column }, DropTarget::Column { id: dest }) => {
            let Some((source, from)) = locate_active(store, id, column) else {
                return DropPlan::None;
            };
            let Some(dest_column) = store.column(dest) else {
                return DropPlan::None;
            };
            if &source == dest {
                let to = dest_column.tasks.len() - 1;
                return reorder(source, from, to);
            }
            DropPlan::MoveTask {
                task: id.clone(),
                source,
                dest: dest.clone(),
                placement: Placement::End,
            }
        }
        (DragItem::Task { id, column }, DropTarget::Task { id: over }) => {
            if id == over {
                return DropPlan::None;
            }
            let Some((source, from)) = locate_active(store, id, column) else {
                return DropPlan::None;
            };
            let Some((dest, to)) = store.locate_task(over) else {
                debug!(task = %over, "hovered task is in no column");
                return DropPlan::None;
            };
            if source == dest {
                return reorder(source, from, to);
            }
            DropPlan::MoveTask { task: id.clone(), source, dest, placement: Placement::Index(to) }
        }
        (DragItem::Column { .. }, DropTarget::Task { .. }) => DropPlan::None,
    }
}

/// Finds the dragged task, trusting the board over the column the card claimed.
fn locate_active(store: &BoardStore, id: &TaskId, claimed: &ColumnId) -> Option<(ColumnId, usize)> {
    let found = store.locate_task(id);
    match &found {
        Some((actual, _)) if actual != claimed => {
            debug!(task = %id, %claimed, %actual, "dragged task moved since render");
        }
        None => debug!(task = %id, "dragged task is in no column"),
        Some(_) => {}
    }
    found
}

fn reorder(column: ColumnId, from: usize, to: usize) -> DropPlan {
    if from == to {
        return DropPlan::None;
    }
    DropPlan::ReorderTask { column, from, to }
}
