//! `taskerize suggest` command.

use super::board::{load, render};
use crate::config::BoardOptions;
use crate::context::ServiceContext;
use crate::model::{TaskDraft, TaskId, TaskMode};

/// Execute the `suggest` command.
///
/// Prints the suggested assignee with the estimate and justification.
/// With `accept`, the task is saved with that assignee.
///
/// # Errors
///
/// Returns an error string if the task is unknown, the suggestion fails
/// or the accepted assignment cannot be saved.
pub async fn run(
    ctx: &ServiceContext,
    options: BoardOptions,
    id: &str,
    mode: TaskMode,
    accept: bool,
) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    let id = TaskId::new(id);
    let task = board.store().task(&id).cloned().ok_or_else(|| format!("No task with id {id}."))?;

    let suggestion = board.suggest_assignee(&id, mode).await.map_err(|e| e.to_string())?;
    println!("Suggested assignee: {} ({})", suggestion.user.name, suggestion.user.email);
    println!("Estimated time: {:.1} h", suggestion.hours_to_complete);
    println!("{}", suggestion.reason);

    if accept {
        let mut draft = TaskDraft::from_task(&task);
        draft.accept_suggestion(&suggestion);
        board.edit_task(&id, draft).await.map_err(|e| e.to_string())?;
        println!("Assigned task {id} to {}.", suggestion.user.name);
        print!("{}", render(board.store()));
    }
    Ok(())
}
