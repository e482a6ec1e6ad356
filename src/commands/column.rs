//! `taskerize column …` commands.

use super::board::{column_named, load, render};
use crate::cli::ColumnCommand;
use crate::config::BoardOptions;
use crate::context::ServiceContext;
use crate::drag::{DragEnd, DragItem, DropTarget};

/// Execute a `column` subcommand.
///
/// # Errors
///
/// Returns an error string for unknown or invalid titles, non-empty
/// columns or failed remote calls.
pub async fn run(
    ctx: &ServiceContext,
    options: BoardOptions,
    command: &ColumnCommand,
) -> Result<(), String> {
    let mut board = load(ctx, options).await?;
    match command {
        ColumnCommand::Add { title } => {
            board.create_column(title).await.map_err(|e| e.to_string())?;
            println!("Created column {:?}.", title.trim());
        }
        ColumnCommand::Rename { title, new_title } => {
            let id = column_named(board.store(), title)?;
            board.rename_column(&id, new_title).await.map_err(|e| e.to_string())?;
            println!("Renamed column {title:?} to {:?}.", new_title.trim());
        }
        ColumnCommand::Delete { title } => {
            let id = column_named(board.store(), title)?;
            board.delete_column(&id).await.map_err(|e| e.to_string())?;
            println!("Deleted column {title:?}.");
        }
        ColumnCommand::Move { title, onto } => {
            let active = DragItem::Column { id: column_named(board.store(), title)? };
            let over = DropTarget::Column { id: column_named(board.store(), onto)? };
            board.drag_start(&active);
            board
                .drag_end(&DragEnd { active, over: Some(over) })
                .await
                .map_err(|e| e.to_string())?;
        }
    }
    print!("{}", render(board.store()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{json, Value};

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn context(calls: Vec<(&str, &str, Value)>) -> ServiceContext {
        let mut all = vec![
            (
                "gateway",
                "list_tasks",
                json!({"Ok": [
                    {"id": "1", "assignee_id": null, "title": "t1", "description": "d",
                     "due_date": null, "technologies": [], "status": "To Do"},
                    {"id": "2", "assignee_id": null, "title": "__init__", "description": "_",
                     "due_date": null, "technologies": [], "status": "Done"}
                ]}),
            ),
            ("gateway", "list_users", json!({"Ok": []})),
        ];
        all.extend(calls);
        let interactions = all
            .into_iter()
            .enumerate()
            .map(|(seq, (port, method, output))| Interaction {
                seq: seq as u64,
                port: port.into(),
                method: method.into(),
                input: json!({}),
                output,
            })
            .collect();
        ServiceContext::from_cassette(&Cassette {
            name: "column".into(),
            recorded_at: Utc::now(),
            task_server: None,
            interactions,
        })
    }

    #[tokio::test]
    async fn deleting_a_column_with_tasks_is_refused() {
        let ctx = context(vec![]);
        let err = run(&ctx, BoardOptions::default(), &ColumnCommand::Delete { title: "To Do".into() })
            .await
            .unwrap_err();
        assert_eq!(err, "column \"To Do\" still holds 1 task(s)");
    }

    #[tokio::test]
    async fn empty_column_is_deleted() {
        let ctx = context(vec![("gateway", "delete_task", json!({"Ok": null}))]);
        run(&ctx, BoardOptions::default(), &ColumnCommand::Delete { title: "Done".into() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_uses_a_generated_id() {
        let ctx = context(vec![
            (
                "gateway",
                "save_task",
                json!({"Ok": {"id": "3", "assignee_id": null, "title": "__init__",
                              "description": "_", "due_date": null, "technologies": [],
                              "status": "Review"}}),
            ),
            ("id_gen", "generate_id", json!("c-1")),
        ]);
        run(&ctx, BoardOptions::default(), &ColumnCommand::Add { title: "Review".into() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn moving_onto_an_unknown_column_fails() {
        let ctx = context(vec![]);
        let command = ColumnCommand::Move { title: "Done".into(), onto: "Later".into() };
        assert!(run(&ctx, BoardOptions::default(), &command).await.is_err());
    }
}
