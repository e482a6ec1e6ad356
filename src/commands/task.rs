//! `taskerize task …` commands.

use super::board::{column_named, column_of, load, render};
use crate::cli::TaskFields;
use crate::config::BoardOptions;
use crate::context::ServiceContext;
use crate::drag::{DragEnd, DragItem, DropPlan, DropTarget};
use crate::model::user::find_user;
use crate::model::{TaskDraft, TaskId, User};

/// Execute `task add`.
///
/// # Errors
///
/// Returns an error string for an unknown column or user, a rejected
/// form or a failed save.
pub async fn add(
    ctx: &ServiceContext,
    options: BoardOptions,
    column: &str,
    fields: &TaskFields,
) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    let column = column_named(board.store(), column)?;

    let mut draft = TaskDraft::new(
        fields.title.clone().unwrap_or_default(),
        fields.description.clone().unwrap_or_default(),
    )
    .with_technologies(fields.technologies.iter().cloned());
    draft.due_date = fields.due;
    draft.assignee = assignee(board.users(), fields.assignee.as_deref())?;
    if let Some(mode) = fields.mode {
        draft.mode = mode.into();
    }

    let id = board.create_task(&column, draft).await.map_err(|e| e.to_string())?;
    println!("Created task {id}.");
    print!("{}", render(board.store()));
    Ok(())
}

/// Execute `task edit`.
///
/// Fields that are not given keep their current value; technologies are
/// replaced as a whole when any is given.
///
/// # Errors
///
/// Returns an error string for an unknown task or user, a rejected form
/// or a failed save.
pub async fn edit(
    ctx: &ServiceContext,
    options: BoardOptions,
    id: &str,
    fields: &TaskFields,
    unassign: bool,
) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    let id = TaskId::new(id);
    let current = board.store().task(&id).ok_or_else(|| format!("No task with id {id}."))?;

    let mut draft = TaskDraft::from_task(current);
    if let Some(title) = &fields.title {
        draft.title.clone_from(title);
    }
    if let Some(description) = &fields.description {
        draft.description.clone_from(description);
    }
    if fields.due.is_some() {
        draft.due_date = fields.due;
    }
    if !fields.technologies.is_empty() {
        draft = draft.with_technologies(fields.technologies.iter().cloned());
    }
    if let Some(mode) = fields.mode {
        draft.mode = mode.into();
    }
    if unassign {
        draft.assignee = None;
    } else if fields.assignee.is_some() {
        draft.assignee = assignee(board.users(), fields.assignee.as_deref())?;
    }

    board.edit_task(&id, draft).await.map_err(|e| e.to_string())?;
    println!("Updated task {id}.");
    print!("{}", render(board.store()));
    Ok(())
}

/// Execute `task delete`.
///
/// # Errors
///
/// Returns an error string for an unknown task or a failed delete.
pub async fn delete(ctx: &ServiceContext, options: BoardOptions, id: &str) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    let id = TaskId::new(id);
    let column = column_of(board.store(), &id)?;
    board.delete_task(&column, &id).await.map_err(|e| e.to_string())?;
    println!("Deleted task {id}.");
    print!("{}", render(board.store()));
    Ok(())
}

/// Execute `task move` by replaying the drag gesture it stands for.
///
/// `to` drops the card on a column, `before` drops it on another card.
///
/// # Errors
///
/// Returns an error string for unknown names or a failed save.
pub async fn move_task(
    ctx: &ServiceContext,
    options: BoardOptions,
    id: &str,
    to: Option<&str>,
    before: Option<&str>,
) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    let id = TaskId::new(id);
    let column = column_of(board.store(), &id)?;

    let over = match (before, to) {
        (Some(task), _) => {
            let task = TaskId::new(task);
            column_of(board.store(), &task)?;
            DropTarget::Task { id: task }
        }
        (None, Some(title)) => DropTarget::Column { id: column_named(board.store(), title)? },
        (None, None) => return Err("Give a destination with --to or --before.".to_string()),
    };

    let active = DragItem::Task { id: id.clone(), column };
    board.drag_start(&active);
    let plan = board
        .drag_end(&DragEnd { active, over: Some(over) })
        .await
        .map_err(|e| e.to_string())?;

    if plan == DropPlan::None {
        println!("Task {id} is already there.");
    } else {
        println!("Moved task {id}.");
    }
    print!("{}", render(board.store()));
    Ok(())
}

fn assignee(users: &[User], id: Option<&str>) -> Result<Option<User>, String> {
    id.map(|id| find_user(users, id).cloned().ok_or_else(|| format!("No user with id {id}.")))
        .transpose()
}
