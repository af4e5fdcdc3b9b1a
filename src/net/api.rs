//! REST helpers for the auth, history, and upload endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Auth endpoints turn non-success responses into `ClientError::Auth` with the
//! server's `message` so callers can show it verbatim. History and upload
//! return `ClientError::Status`; their callers only log.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::path::Path;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::Value;

use super::types::{ChatMessage, Credentials, ErrorBody, LoginResponse, parse_history};
use crate::config::ClientConfig;
use crate::error::ClientError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const MESSAGES_PATH: &str = "/api/messages";
pub const UPLOAD_PATH: &str = "/api/upload";

/// Multipart field name the upload endpoint reads.
const UPLOAD_FIELD: &str = "file";

/// A file ready to be posted to the upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name);
        Self { file_name, mime, bytes }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }
}

/// Thin wrapper over `reqwest::Client` bound to one service origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Auth`] on rejection, [`ClientError::Http`] when the
    /// request never completes, [`ClientError::InvalidJson`] for a malformed
    /// success body.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(self.config.endpoint(LOGIN_PATH))
            .json(&Credentials { username, password })
            .send()
            .await?;
        let response = auth_error_for_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `POST /auth/register`. No token is issued.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::login`].
    pub async fn register(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.config.endpoint(REGISTER_PATH))
            .json(&Credentials { username, password })
            .send()
            .await?;
        auth_error_for_status(response).await?;
        Ok(())
    }

    /// `GET /api/messages` with bearer auth.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] for non-success responses, [`ClientError::Http`]
    /// on transport failure, [`ClientError::InvalidJson`] for a malformed body.
    pub async fn fetch_messages(&self, token: &str) -> Result<Vec<ChatMessage>, ClientError> {
        let response = self
            .http
            .get(self.config.endpoint(MESSAGES_PATH))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await?;
        let response = error_for_status(response)?;
        let body = response.text().await?;
        Ok(parse_history(&body)?)
    }

    /// `POST /api/upload` as multipart with bearer auth.
    ///
    /// The response body is returned as JSON when it parses, `Null` otherwise.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] for non-success responses, [`ClientError::Http`]
    /// on transport failure.
    pub async fn upload(&self, token: &str, file: UploadFile) -> Result<Value, ClientError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(file.mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(self.config.endpoint(UPLOAD_PATH))
            .header(AUTHORIZATION, bearer(token))
            .multipart(form)
            .send()
            .await?;
        let response = error_for_status(response)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn error_for_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status { status: status.as_u16() })
    }
}

async fn auth_error_for_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(auth_error(status, &body))
}

fn auth_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("authentication failed (HTTP {})", status.as_u16()));
    ClientError::Auth { status: status.as_u16(), message }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
