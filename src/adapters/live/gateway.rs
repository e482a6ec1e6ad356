//! Live adapter for the `TaskGateway` port over the task and user HTTP services.

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::model::{StatusLabel, TaskId, User};
use crate::ports::gateway::{
    AssigneeChoice, GatewayFuture, SuggestionMode, TaskGateway, TaskRecord, TaskRecordInput,
};

/// Gateway that talks to the task and user services over HTTP.
pub struct HttpTaskGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpTaskGateway {
    /// Creates a gateway for the given service URLs.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self { client: Client::new(), config }
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/task/", self.config.task_server)
    }

    fn create_url(&self) -> String {
        format!("{}/api/task/create/", self.config.task_server)
    }

    fn patch_url(&self, id: &TaskId) -> String {
        format!("{}/api/task/patch/{id}/", self.config.task_server)
    }

    fn delete_url(&self, id: &TaskId) -> String {
        format!("{}/api/task/deletar/{id}/", self.config.task_server)
    }

    fn suggest_url(&self, id: &TaskId, mode: SuggestionMode) -> String {
        format!("{}/api/task/selectUser/{id}/?mode={}", self.config.task_server, mode.as_str())
    }

    fn users_url(&self) -> String {
        format!("{}/api/get", self.config.user_server)
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<String, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Request { url: url.to_string(), message: e.to_string() })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Request { url: url.to_string(), message: e.to_string() })?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no reason").to_string()
            } else {
                body
            };
            return Err(GatewayError::Status { url: url.to_string(), status: status.as_u16(), message });
        }
        tracing::debug!(%url, status = status.as_u16(), "gateway request succeeded");
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GatewayError> {
        let body = self.send(self.client.get(&url), &url).await?;
        decode(&url, &body)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode { url: url.to_string(), message: e.to_string() })
}

/// Ids arrive as JSON strings or numbers depending on the service.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Task as serialized by the task service.
#[derive(Debug, Deserialize)]
struct WireTask {
    id: RawId,
    #[serde(default)]
    id_user: Option<RawId>,
    #[serde(default)]
    titulo: String,
    #[serde(default)]
    descricao: String,
    #[serde(default)]
    prazo: Option<NaiveDate>,
    #[serde(default)]
    skills: Option<Vec<String>>,
    status: String,
}

impl From<WireTask> for TaskRecord {
    fn from(wire: WireTask) -> Self {
        Self {
            id: TaskId::new(String::from(wire.id)),
            assignee_id: wire.id_user.map(String::from),
            title: wire.titulo,
            description: wire.descricao,
            due_date: wire.prazo,
            technologies: wire.skills.unwrap_or_default(),
            status: StatusLabel::new(wire.status),
        }
    }
}

/// Body of the create and patch calls.
#[derive(Serialize)]
struct TaskPayload<'a> {
    id_user: Option<&'a str>,
    titulo: &'a str,
    descricao: &'a str,
    skills: &'a [String],
    prazo: Option<NaiveDate>,
    status: &'a str,
}

impl<'a> From<&'a TaskRecordInput> for TaskPayload<'a> {
    fn from(input: &'a TaskRecordInput) -> Self {
        Self {
            id_user: input.assignee_id.as_deref(),
            titulo: &input.title,
            descricao: &input.description,
            skills: &input.technologies,
            prazo: input.due_date,
            status: input.status.as_str(),
        }
    }
}

/// User as serialized by the user service.
#[derive(Deserialize)]
struct WireUser {
    id: RawId,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        let name = format!("{} {}", wire.first_name, wire.last_name).trim().to_string();
        Self { id: String::from(wire.id), name, email: wire.email }
    }
}

/// Answer of the assignee suggestion endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChoice {
    top_choice: RawId,
    hours_to_complete_task: f64,
    reason_why_top_choice_is_better: String,
}

impl From<WireChoice> for AssigneeChoice {
    fn from(wire: WireChoice) -> Self {
        Self {
            user_id: String::from(wire.top_choice),
            hours_to_complete: wire.hours_to_complete_task,
            reason: wire.reason_why_top_choice_is_better,
        }
    }
}

impl TaskGateway for HttpTaskGateway {
    fn list_tasks(&self) -> GatewayFuture<'_, Vec<TaskRecord>> {
        Box::pin(async move {
            let tasks: Vec<WireTask> = self.get_json(self.tasks_url()).await?;
            Ok(tasks.into_iter().map(TaskRecord::from).collect())
        })
    }

    fn list_users(&self) -> GatewayFuture<'_, Vec<User>> {
        Box::pin(async move {
            let users: Vec<WireUser> = self.get_json(self.users_url()).await?;
            Ok(users.into_iter().map(User::from).collect())
        })
    }

    fn save_task(&self, input: &TaskRecordInput) -> GatewayFuture<'_, TaskRecord> {
        let input = input.clone();

        Box::pin(async move {
            let payload = TaskPayload::from(&input);
            let (url, request) = if input.id.is_unsaved() {
                let url = self.create_url();
                let request = self.client.post(&url).json(&payload);
                (url, request)
            } else {
                let url = self.patch_url(&input.id);
                let request = self.client.patch(&url).json(&payload);
                (url, request)
            };

            let body = self.send(request, &url).await?;
            let task: WireTask = decode(&url, &body)?;
            Ok(TaskRecord::from(task))
        })
    }

    fn delete_task(&self, id: &TaskId) -> GatewayFuture<'_, ()> {
        let url = self.delete_url(id);

        Box::pin(async move {
            self.send(self.client.delete(&url), &url).await?;
            Ok(())
        })
    }

    fn suggest_assignee(
        &self,
        id: &TaskId,
        mode: SuggestionMode,
    ) -> GatewayFuture<'_, AssigneeChoice> {
        let url = self.suggest_url(id, mode);

        Box::pin(async move {
            let choice: WireChoice = self.get_json(url).await?;
            Ok(AssigneeChoice::from(choice))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpTaskGateway {
        HttpTaskGateway::new(GatewayConfig::new("http://tasks:8000/", "http://users:8001"))
    }

    #[test]
    fn endpoints_follow_service_layout() {
        let gw = gateway();
        let id = TaskId::new("42");
        assert_eq!(gw.tasks_url(), "http://tasks:8000/api/task/");
        assert_eq!(gw.create_url(), "http://tasks:8000/api/task/create/");
        assert_eq!(gw.patch_url(&id), "http://tasks:8000/api/task/patch/42/");
        assert_eq!(gw.delete_url(&id), "http://tasks:8000/api/task/deletar/42/");
        assert_eq!(
            gw.suggest_url(&id, SuggestionMode::Knowledge),
            "http://tasks:8000/api/task/selectUser/42/?mode=knowledge"
        );
        assert_eq!(gw.users_url(), "http://users:8001/api/get");
    }

    #[test]
    fn decodes_wire_task_with_numeric_ids() {
        let body = r#"{"id": 7, "id_user": 3, "titulo": "Deploy", "descricao": "prod",
                       "prazo": "2025-05-01", "skills": ["Docker"], "status": "Done"}"#;
        let record = TaskRecord::from(decode::<WireTask>("u", body).unwrap());
        assert_eq!(record.id, TaskId::new("7"));
        assert_eq!(record.assignee_id.as_deref(), Some("3"));
        assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(record.status.as_str(), "Done");
    }

    #[test]
    fn null_skills_and_user_decode_as_empty() {
        let body = r#"{"id": "a1", "id_user": null, "titulo": "__init__", "descricao": "_",
                       "prazo": null, "skills": null, "status": "Backlog"}"#;
        let record = TaskRecord::from(decode::<WireTask>("u", body).unwrap());
        assert!(record.assignee_id.is_none());
        assert!(record.technologies.is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode::<Vec<WireTask>>("http://tasks/api/task/", "<html>").unwrap_err();
        assert!(matches!(err, GatewayError::Decode { .. }));
    }

    #[test]
    fn payload_uses_service_field_names() {
        let input = TaskRecordInput {
            id: TaskId::unsaved(),
            assignee_id: Some("u9".into()),
            title: "Review".into(),
            description: "PR 12".into(),
            due_date: None,
            technologies: vec!["Rust".into()],
            status: StatusLabel::new("In Progress"),
        };
        let json = serde_json::to_value(TaskPayload::from(&input)).unwrap();
        assert_eq!(json["id_user"], "u9");
        assert_eq!(json["titulo"], "Review");
        assert_eq!(json["descricao"], "PR 12");
        assert_eq!(json["skills"][0], "Rust");
        assert!(json["prazo"].is_null());
        assert_eq!(json["status"], "In Progress");
    }

    #[test]
    fn user_name_joins_first_and_last() {
        let body = r#"{"id": 1, "first_name": "Ana", "last_name": "Lima", "email": "a@x.io"}"#;
        let user = User::from(decode::<WireUser>("u", body).unwrap());
        assert_eq!(user.name, "Ana Lima");
        assert_eq!(user.id, "1");
    }

    #[test]
    fn decodes_suggestion() {
        let body = r#"{"topChoice": "u2", "hoursToCompleteTask": 6.5,
                       "reasonWhyTopChoiceIsBetter": "u2 knows React"}"#;
        let choice = AssigneeChoice::from(decode::<WireChoice>("u", body).unwrap());
        assert_eq!(choice.user_id, "u2");
        assert!((choice.hours_to_complete - 6.5).abs() < f64::EPSILON);
        assert_eq!(choice.reason, "u2 knows React");
    }
}
