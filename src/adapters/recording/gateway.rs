//! Recording adapter for the `TaskGateway` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::{TaskId, User};
use crate::ports::gateway::{
    AssigneeChoice, GatewayFuture, SuggestionMode, TaskGateway, TaskRecord, TaskRecordInput,
};

const PORT: &str = "gateway";

/// Records gateway interactions while delegating to an inner implementation.
pub struct RecordingTaskGateway {
    inner: Box<dyn TaskGateway>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskGateway {
    /// Creates a new recording gateway wrapping the given implementation.
    pub fn new(inner: Box<dyn TaskGateway>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct NoInput {}

#[derive(Serialize)]
struct IdInput<'a> {
    id: &'a TaskId,
}

#[derive(Serialize)]
struct SuggestInput<'a> {
    id: &'a TaskId,
    mode: SuggestionMode,
}

impl TaskGateway for RecordingTaskGateway {
    fn list_tasks(&self) -> GatewayFuture<'_, Vec<TaskRecord>> {
        Box::pin(async move {
            let result = self.inner.list_tasks().await;
            record_result(&self.recorder, PORT, "list_tasks", &NoInput {}, &result);
            result
        })
    }

    fn list_users(&self) -> GatewayFuture<'_, Vec<User>> {
        Box::pin(async move {
            let result = self.inner.list_users().await;
            record_result(&self.recorder, PORT, "list_users", &NoInput {}, &result);
            result
        })
    }

    fn save_task(&self, input: &TaskRecordInput) -> GatewayFuture<'_, TaskRecord> {
        let input = input.clone();

        Box::pin(async move {
            let result = self.inner.save_task(&input).await;
            record_result(&self.recorder, PORT, "save_task", &input, &result);
            result
        })
    }

    fn delete_task(&self, id: &TaskId) -> GatewayFuture<'_, ()> {
        let id = id.clone();

        Box::pin(async move {
            let result = self.inner.delete_task(&id).await;
            record_result(&self.recorder, PORT, "delete_task", &IdInput { id: &id }, &result);
            result
        })
    }

    fn suggest_assignee(
        &self,
        id: &TaskId,
        mode: SuggestionMode,
    ) -> GatewayFuture<'_, AssigneeChoice> {
        let id = id.clone();

        Box::pin(async move {
            let result = self.inner.suggest_assignee(&id, mode).await;
            let input = SuggestInput { id: &id, mode };
            record_result(&self.recorder, PORT, "suggest_assignee", &input, &result);
            result
        })
    }
}
