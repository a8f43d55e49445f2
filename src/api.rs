use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Column, Comment, HistoryEntry, Priority, Task, User};

/// Errors from the remote board gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not authenticated: the server rejected the credential")]
    Unauthorized,

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Credentials returned by login and invite acceptance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// A pending invitation. The token is what the invitee redeems.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptInviteRequest<'a> {
    token: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Body for creating a task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order_index: u32,
    pub column_id: String,
}

/// Partial task update. Only set fields go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<String>>,
    /// Double option: outer = send the field, inner = the new value (null clears).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<chrono::NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Option<String>>,
}

impl TaskPatch {
    /// Reindex within the current column.
    pub fn order(order_index: u32) -> Self {
        Self {
            order_index: Some(order_index),
            ..Self::default()
        }
    }

    /// Move to another column at a given index.
    pub fn move_to(column_id: &str, order_index: u32) -> Self {
        Self {
            column_id: Some(column_id.to_string()),
            order_index: Some(order_index),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCreate {
    pub title: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReorderRequest<'a> {
    ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct CommentCreate<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct InviteCreate<'a> {
    email: &'a str,
}

/// Blocking HTTP gateway to the board server.
///
/// One method per endpoint; no retry, no batching. Every call returns either
/// the decoded body or an `ApiError`.
pub struct ApiClient {
    base: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn auth(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map non-success statuses to typed errors, passing success through.
    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    // ───── auth ─────

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn accept_invite(
        &self,
        token: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        let resp = self
            .http
            .post(self.url("/auth/accept-invite"))
            .json(&AcceptInviteRequest { token, password, name })
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    // ───── board ─────

    /// Fetch all columns with nested tasks, optionally filtered by assignee name.
    pub fn get_board(&self, assignee: Option<&str>) -> Result<Vec<Column>, ApiError> {
        let mut req = self.http.get(self.url("/columns"));
        if let Some(name) = assignee {
            req = req.query(&[("assignee", name)]);
        }
        let resp = self.auth(req).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn create_column(&self, body: &ColumnCreate) -> Result<Column, ApiError> {
        let resp = self.auth(self.http.post(self.url("/columns")).json(body)).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn update_column(&self, id: &str, body: &ColumnPatch) -> Result<Column, ApiError> {
        let resp = self
            .auth(self.http.patch(self.url(&format!("/columns/{id}"))).json(body))
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn delete_column(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .auth(self.http.delete(self.url(&format!("/columns/{id}"))))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// Atomically renumber all columns to match the given id order.
    pub fn reorder_columns(&self, ids: &[String]) -> Result<(), ApiError> {
        let resp = self
            .auth(
                self.http
                    .patch(self.url("/columns/reorder/all"))
                    .json(&ReorderRequest { ids }),
            )
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    // ───── tasks ─────

    pub fn create_task(&self, body: &TaskCreate) -> Result<Task, ApiError> {
        let resp = self.auth(self.http.post(self.url("/tasks")).json(body)).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn update_task(&self, id: &str, body: &TaskPatch) -> Result<Task, ApiError> {
        let resp = self
            .auth(self.http.patch(self.url(&format!("/tasks/{id}"))).json(body))
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .auth(self.http.delete(self.url(&format!("/tasks/{id}"))))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    // ───── users & invites ─────

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let resp = self.auth(self.http.get(self.url("/users"))).send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn create_invite(&self, email: &str) -> Result<Invite, ApiError> {
        let resp = self
            .auth(self.http.post(self.url("/invites")).json(&InviteCreate { email }))
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    // ───── comments & history ─────

    pub fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>, ApiError> {
        let resp = self
            .auth(self.http.get(self.url(&format!("/tasks/{task_id}/comments"))))
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn add_comment(&self, task_id: &str, content: &str) -> Result<Comment, ApiError> {
        let resp = self
            .auth(
                self.http
                    .post(self.url(&format!("/tasks/{task_id}/comments")))
                    .json(&CommentCreate { content }),
            )
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }

    pub fn list_history(&self, task_id: &str) -> Result<Vec<HistoryEntry>, ApiError> {
        let resp = self
            .auth(self.http.get(self.url(&format!("/tasks/{task_id}/history"))))
            .send()?;
        Ok(Self::check(resp)?.json()?)
    }
}

/// The gateway surface the board store drives. `ApiClient` is the real
/// implementation; tests substitute a recording fake.
pub trait BoardGateway {
    fn get_board(&self, assignee: Option<&str>) -> Result<Vec<Column>, ApiError>;
    fn create_column(&self, body: &ColumnCreate) -> Result<Column, ApiError>;
    fn update_column(&self, id: &str, body: &ColumnPatch) -> Result<Column, ApiError>;
    fn delete_column(&self, id: &str) -> Result<(), ApiError>;
    fn reorder_columns(&self, ids: &[String]) -> Result<(), ApiError>;
    fn create_task(&self, body: &TaskCreate) -> Result<Task, ApiError>;
    fn update_task(&self, id: &str, body: &TaskPatch) -> Result<Task, ApiError>;
    fn delete_task(&self, id: &str) -> Result<(), ApiError>;
}

impl BoardGateway for ApiClient {
    fn get_board(&self, assignee: Option<&str>) -> Result<Vec<Column>, ApiError> {
        ApiClient::get_board(self, assignee)
    }

    fn create_column(&self, body: &ColumnCreate) -> Result<Column, ApiError> {
        ApiClient::create_column(self, body)
    }

    fn update_column(&self, id: &str, body: &ColumnPatch) -> Result<Column, ApiError> {
        ApiClient::update_column(self, id, body)
    }

    fn delete_column(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_column(self, id)
    }

    fn reorder_columns(&self, ids: &[String]) -> Result<(), ApiError> {
        ApiClient::reorder_columns(self, ids)
    }

    fn create_task(&self, body: &TaskCreate) -> Result<Task, ApiError> {
        ApiClient::create_task(self, body)
    }

    fn update_task(&self, id: &str, body: &TaskPatch) -> Result<Task, ApiError> {
        ApiClient::update_task(self, id, body)
    }

    fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_task(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_patch_serializes_only_set_fields() {
        let patch = TaskPatch::order(3);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"orderIndex": 3}));
    }

    #[test]
    fn task_patch_move_carries_column_and_index() {
        let patch = TaskPatch::move_to("col-b", 0);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"columnId": "col-b", "orderIndex": 0}));
    }

    #[test]
    fn task_patch_explicit_null_clears_due_date() {
        let patch = TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"dueDate": null}));
    }

    #[test]
    fn task_patch_assignee_ids_serialize_as_camel_case() {
        let patch = TaskPatch {
            assignee_ids: Some(vec!["u1".into(), "u2".into()]),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"assigneeIds": ["u1", "u2"]}));
    }

    #[test]
    fn task_create_wire_shape() {
        let body = TaskCreate {
            title: "New Task".into(),
            description: None,
            order_index: 4,
            column_id: "c-1".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "New Task", "orderIndex": 4, "columnId": "c-1"})
        );
    }

    #[test]
    fn auth_response_decodes_camel_case() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"accessToken": "jwt", "user": {"id": "u", "email": "a@b.c", "isAdmin": true}}"#,
        )
        .unwrap();
        assert_eq!(resp.access_token, "jwt");
        assert!(resp.user.is_admin);
    }

    #[test]
    fn client_strips_trailing_slash_from_base() {
        let api = ApiClient::new("http://localhost:3000/", None).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.url("/columns"), "http://localhost:3000/columns");
    }
}
