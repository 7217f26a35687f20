//! Movieflix API gateway client
//!
//! Every request goes to `{base_url}{path}` as JSON. When the injected
//! session holds a credential it is sent as a bearer token. Single attempt,
//! no retry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::SessionContext;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Server-provided `error` message, if the response carried one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message to show a user: the server's, else the fallback
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Error payload the gateway sends on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP adapter shared by every screen and CLI command
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Create a client for the given gateway base URL
    pub fn new(base_url: impl Into<String>, session: Arc<SessionContext>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().build().unwrap_or_default(),
            session,
        }
    }

    /// Apply a per-request timeout (none by default)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Send one request, attaching the bearer credential when present
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "api request");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.credential().filter(|t| !t.is_empty()) {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.error);
        warn!(%method, path, status = status.as_u16(), message = ?message, "api request rejected");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    /// GET a body that may legitimately be empty or `null`
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        let body = response.text().await?;
        parse_optional(&body)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Empty body, `null` and `{}` all mean "nothing here"
fn parse_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;
    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleDetail;

    #[test]
    fn test_user_message_prefers_server() {
        let err = ApiError::Status {
            status: 401,
            message: Some("Invalid username or password".into()),
        };
        assert_eq!(
            err.user_message("Something went wrong"),
            "Invalid username or password"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");

        let err = ApiError::InvalidResponse("bad".into());
        assert_eq!(err.user_message("Google Login failed"), "Google Login failed");
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 404,
            message: Some("User with this email not found".into()),
        };
        assert_eq!(err.to_string(), "Server returned 404: User with this email not found");
        assert!(err.is_not_found());

        let bare = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "Server returned 502");
    }

    #[test]
    fn test_parse_optional_empty_shapes() {
        assert!(parse_optional::<TitleDetail>("").unwrap().is_none());
        assert!(parse_optional::<TitleDetail>("null").unwrap().is_none());
        assert!(parse_optional::<TitleDetail>(" {} ").unwrap().is_none());
        assert!(parse_optional::<TitleDetail>("[oops").is_err());
    }

    #[test]
    fn test_parse_optional_object() {
        let detail = parse_optional::<TitleDetail>(r#"{"id": 7, "title": "Se7en"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(detail.id, 7);
        assert_eq!(detail.title, "Se7en");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(
            "http://localhost:5000/api/",
            Arc::new(SessionContext::ephemeral()),
        );
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}
