//! Drag gestures applied to a loaded board, end to end through the
//! controller and a replayed task service.

use chrono::Utc;
use serde_json::{json, Value};

use taskerize::board::{BoardController, BoardStore};
use taskerize::cassette::format::{Cassette, Interaction};
use taskerize::config::BoardOptions;
use taskerize::context::ServiceContext;
use taskerize::drag::{DragEnd, DragItem, DropPlan, DropTarget};
use taskerize::error::{BoardError, ErrorClass};
use taskerize::model::{ColumnId, TaskId};

fn task(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "assignee_id": null,
        "title": format!("task {id}"),
        "description": "d",
        "due_date": null,
        "technologies": [],
        "status": status
    })
}

fn context(tasks: Vec<Value>, responses: Vec<(&str, Value)>) -> ServiceContext {
    let mut calls = vec![("list_tasks", json!({ "Ok": tasks })), ("list_users", json!({"Ok": []}))];
    calls.extend(responses);
    let interactions = calls
        .into_iter()
        .enumerate()
        .map(|(seq, (method, output))| Interaction {
            seq: seq as u64,
            port: "gateway".into(),
            method: method.into(),
            input: json!({}),
            output,
        })
        .collect();
    ServiceContext::from_cassette(&Cassette {
        name: "drag".into(),
        recorded_at: Utc::now(),
        task_server: None,
        interactions,
    })
}

fn ids(store: &BoardStore, column: &str) -> Vec<String> {
    store
        .column(&ColumnId::new(column))
        .unwrap()
        .visible_tasks()
        .map(|t| t.id.to_string())
        .collect()
}

async fn drag(
    board: &mut BoardController<'_>,
    active: DragItem,
    over: Option<DropTarget>,
) -> Result<DropPlan, BoardError> {
    board.drag_start(&active);
    let result = board.drag_end(&DragEnd { active, over }).await;
    assert!(board.drag_session().is_idle());
    result
}

fn task_item(id: &str, column: &str) -> DragItem {
    DragItem::Task { id: TaskId::new(id), column: ColumnId::new(column) }
}

#[tokio::test]
async fn drop_on_empty_column_moves_task_and_status() {
    let ctx = context(
        vec![task("t1", "A"), task("t2", "A"), json!({
            "id": "p", "assignee_id": null, "title": "__init__", "description": "_",
            "due_date": null, "technologies": [], "status": "B"
        })],
        vec![("save_task", json!({"Ok": task("t1", "B")}))],
    );
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Column { id: ColumnId::new("1") });
    drag(&mut board, task_item("t1", "0"), over).await.unwrap();

    assert_eq!(ids(board.store(), "0"), vec!["t2"]);
    assert_eq!(ids(board.store(), "1"), vec!["t1"]);
    assert_eq!(board.store().status_of(&TaskId::new("t1")).unwrap().as_str(), "B");
}

#[tokio::test]
async fn drop_on_task_in_same_column_reorders_locally() {
    let ctx = context(vec![task("t1", "A"), task("t2", "A"), task("t3", "A")], vec![]);
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Task { id: TaskId::new("t1") });
    let plan = drag(&mut board, task_item("t3", "0"), over).await.unwrap();

    assert_eq!(plan, DropPlan::ReorderTask { column: ColumnId::new("0"), from: 2, to: 0 });
    assert_eq!(ids(board.store(), "0"), vec!["t3", "t1", "t2"]);
}

#[tokio::test]
async fn drop_on_task_in_other_column_takes_its_slot() {
    let ctx = context(
        vec![task("t1", "A"), task("t2", "B"), task("t3", "B")],
        vec![("save_task", json!({"Ok": task("t1", "B")}))],
    );
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Task { id: TaskId::new("t3") });
    drag(&mut board, task_item("t1", "0"), over).await.unwrap();

    assert!(ids(board.store(), "0").is_empty());
    assert_eq!(ids(board.store(), "1"), vec!["t2", "t1", "t3"]);
}

#[tokio::test]
async fn failed_confirmation_keeps_the_task_home() {
    let ctx = context(
        vec![task("t1", "A"), task("t2", "B")],
        vec![("save_task", json!({"Err": "connection reset"}))],
    );
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Column { id: ColumnId::new("1") });
    let err = drag(&mut board, task_item("t1", "0"), over).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Remote);
    assert_eq!(ids(board.store(), "0"), vec!["t1"]);
    assert_eq!(ids(board.store(), "1"), vec!["t2"]);
    assert_eq!(board.store().status_of(&TaskId::new("t1")).unwrap().as_str(), "A");
}

#[tokio::test]
async fn column_drag_never_changes_contents() {
    let ctx = context(vec![task("t1", "A"), task("t2", "B"), task("t3", "C")], vec![]);
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Column { id: ColumnId::new("2") });
    drag(&mut board, DragItem::Column { id: ColumnId::new("0") }, over).await.unwrap();

    let order: Vec<&str> = board.store().columns().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert_eq!(ids(board.store(), "0"), vec!["t1"]);
    assert_eq!(ids(board.store(), "1"), vec!["t2"]);
    assert_eq!(ids(board.store(), "2"), vec!["t3"]);
}

#[tokio::test]
async fn cancelled_or_stale_drops_change_nothing() {
    let ctx = context(vec![task("t1", "A"), task("t2", "B")], vec![]);
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let plan = drag(&mut board, task_item("t1", "0"), None).await.unwrap();
    assert_eq!(plan, DropPlan::None);
    let stale = Some(DropTarget::Task { id: TaskId::new("gone") });
    let plan = drag(&mut board, task_item("t1", "0"), stale).await.unwrap();
    assert_eq!(plan, DropPlan::None);

    assert_eq!(ids(board.store(), "0"), vec!["t1"]);
    assert_eq!(ids(board.store(), "1"), vec!["t2"]);
}

#[tokio::test]
async fn placeholder_cards_cannot_be_dragged_away() {
    let ctx = context(
        vec![task("t1", "A"), json!({
            "id": "p", "assignee_id": null, "title": "__init__", "description": "_",
            "due_date": null, "technologies": [], "status": "B"
        })],
        vec![],
    );
    let mut board = BoardController::load(&ctx, BoardOptions::default()).await.unwrap();

    let over = Some(DropTarget::Column { id: ColumnId::new("0") });
    let plan = drag(&mut board, task_item("p", "1"), over).await.unwrap();

    assert_eq!(plan, DropPlan::None);
    assert_eq!(board.store().status_of(&TaskId::new("p")).unwrap().as_str(), "B");
    assert_eq!(ids(board.store(), "0"), vec!["t1"]);
}
