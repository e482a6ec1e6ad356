//! Replaying adapter for the `TaskGateway` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GatewayError;
use crate::model::{TaskId, User};
use crate::ports::gateway::{
    AssigneeChoice, GatewayFuture, SuggestionMode, TaskGateway, TaskRecord, TaskRecordInput,
};

/// Serves recorded gateway results from a cassette.
///
/// Inputs are ignored; each method answers with the next recorded
/// output for that method. A cassette that runs dry answers with
/// [`GatewayError::Replayed`].
pub struct ReplayingTaskGateway {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskGateway {
    /// Create a replaying gateway backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T>(&self, method: &'static str) -> GatewayFuture<'_, T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let result = next_output(&self.replayer, "gateway", method)
            .map_err(|e| GatewayError::Replayed(e.to_string()))
            .and_then(|output| replay_result(output, &format!("gateway::{method}")));
        Box::pin(async move { result })
    }
}

impl TaskGateway for ReplayingTaskGateway {
    fn list_tasks(&self) -> GatewayFuture<'_, Vec<TaskRecord>> {
        self.replay("list_tasks")
    }

    fn list_users(&self) -> GatewayFuture<'_, Vec<User>> {
        self.replay("list_users")
    }

    fn save_task(&self, _input: &TaskRecordInput) -> GatewayFuture<'_, TaskRecord> {
        self.replay("save_task")
    }

    fn delete_task(&self, _id: &TaskId) -> GatewayFuture<'_, ()> {
        self.replay("delete_task")
    }

    fn suggest_assignee(
        &self,
        _id: &TaskId,
        _mode: SuggestionMode,
    ) -> GatewayFuture<'_, AssigneeChoice> {
        self.replay("suggest_assignee")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::recording::RecordingTaskGateway;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::recorder::CassetteRecorder;
    use crate::model::StatusLabel;
    use chrono::Utc;
    use serde_json::json;

    fn gateway(interactions: Vec<(&str, serde_json::Value)>) -> ReplayingTaskGateway {
        let interactions = interactions
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
        ReplayingTaskGateway::new(CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            task_server: None,
            interactions,
        }))
    }

    fn record_json() -> serde_json::Value {
        json!({
            "id": "12",
            "assignee_id": null,
            "title": "Write docs",
            "description": "README",
            "due_date": "2025-02-01",
            "technologies": [],
            "status": "Done"
        })
    }

    #[tokio::test]
    async fn replays_saved_task() {
        let gw = gateway(vec![("save_task", json!({"Ok": record_json()}))]);
        let input = TaskRecordInput {
            id: TaskId::new("12"),
            assignee_id: None,
            title: "Write docs".into(),
            description: "README".into(),
            due_date: None,
            technologies: vec![],
            status: StatusLabel::new("Done"),
        };
        let record = gw.save_task(&input).await.unwrap();
        assert_eq!(record.id, TaskId::new("12"));
        assert_eq!(record.status.as_str(), "Done");
    }

    #[tokio::test]
    async fn replays_recorded_failure() {
        let gw = gateway(vec![("delete_task", json!({"Err": "answered 500"}))]);
        let err = gw.delete_task(&TaskId::new("1")).await.unwrap_err();
        assert_eq!(err, GatewayError::Replayed("answered 500".into()));
    }

    #[tokio::test]
    async fn missing_recording_is_an_error_not_a_panic() {
        let gw = gateway(vec![]);
        let err = gw.list_users().await.unwrap_err();
        assert!(err.to_string().contains("no interactions"));
    }

    #[tokio::test]
    async fn recording_wrapper_captures_the_sent_status() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("/unused", "test")));
        let gw = RecordingTaskGateway::new(
            Box::new(gateway(vec![("save_task", json!({"Ok": record_json()}))])),
            Arc::clone(&recorder),
        );
        let input = TaskRecordInput {
            id: TaskId::new("12"),
            assignee_id: Some("u1".into()),
            title: "Write docs".into(),
            description: "README".into(),
            due_date: None,
            technologies: vec![],
            status: StatusLabel::new("Done"),
        };
        gw.save_task(&input).await.unwrap();

        let guard = recorder.lock().unwrap();
        let recorded = &guard.interactions()[0];
        assert_eq!(recorded.method, "save_task");
        assert_eq!(recorded.input["status"], "Done");
        assert_eq!(recorded.input["assignee_id"], "u1");
        assert_eq!(recorded.output["Ok"]["id"], "12");
    }
}
