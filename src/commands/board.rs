//! `taskerize board` command, plus the board helpers shared by the other commands.

use std::fmt::Write as _;

use crate::board::{BoardController, BoardStore};
use crate::config::BoardOptions;
use crate::context::ServiceContext;
use crate::model::{ColumnId, Task, TaskId};

/// Execute the `board` command.
///
/// Prints every column with its tasks; placeholder tasks are hidden.
///
/// # Errors
///
/// Returns an error string if the board cannot be loaded.
pub async fn run(ctx: &ServiceContext, options: BoardOptions) -> Result<(), String> {
    let board = load(ctx, options).await?;
    print!("{}", render(board.store()));
    Ok(())
}

/// Loads the board, turning failures into a printable message.
pub(crate) async fn load(
    ctx: &ServiceContext,
    options: BoardOptions,
) -> Result<BoardController<'_>, String> {
    BoardController::load(ctx, options).await.map_err(|e| e.to_string())
}

/// Finds a column by its title.
pub(crate) fn column_named(store: &BoardStore, title: &str) -> Result<ColumnId, String> {
    store
        .column_by_title(title)
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("No column titled {title:?}."))
}

/// Finds the column holding a task.
pub(crate) fn column_of(store: &BoardStore, id: &TaskId) -> Result<ColumnId, String> {
    store.locate_task(id).map(|(column, _)| column).ok_or_else(|| format!("No task with id {id}."))
}

/// Renders the board as plain text.
pub(crate) fn render(store: &BoardStore) -> String {
    let mut out = String::new();
    if store.columns().is_empty() {
        out.push_str("The board is empty.\n");
        return out;
    }
    for column in store.columns() {
        let _ = writeln!(out, "{} ({})", column.title, column.real_task_count());
        for task in column.visible_tasks() {
            let _ = writeln!(out, "  {}", render_task(task));
        }
    }
    out
}

fn render_task(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.id, task.title);
    if let Some(user) = &task.assignee {
        let _ = write!(line, " @{}", user.name);
    }
    if let Some(due) = task.due_date {
        let _ = write!(line, " due {due}");
    }
    if !task.technologies.is_empty() {
        let _ = write!(line, " [{}]", task.technologies.join(", "));
    }
    line
}
