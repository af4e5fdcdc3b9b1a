//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! Chat events are JSON objects interpreted by field name only. The `type`
//! field selects between text and image payloads, but the client keeps
//! whatever fields arrive and lets rendering pick what is present.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub const NEW_TEXT: &str = "NEW_TEXT";
pub const NEW_IMAGE: &str = "NEW_IMAGE";

/// Event type carried in the `type` field of a chat frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    NewText,
    NewImage,
    /// Any type string this client does not know about.
    Other(String),
}

impl From<String> for MessageKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            NEW_TEXT => Self::NewText,
            NEW_IMAGE => Self::NewImage,
            _ => Self::Other(raw),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::NewText => NEW_TEXT.to_owned(),
            MessageKind::NewImage => NEW_IMAGE.to_owned(),
            MessageKind::Other(raw) => raw,
        }
    }
}

/// A chat event pushed by the server or returned by the history endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Server-assigned message number. Not unique on redelivery.
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub message_id: i64,
    /// Author identifier.
    #[serde(default, deserialize_with = "deserialize_string_from_scalar")]
    pub user_id: String,
    /// Author display name.
    #[serde(default)]
    pub username: String,
    /// Image location for `NEW_IMAGE` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Message text for `NEW_TEXT` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Outbound frame sent over the live connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundText<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: &'a str,
}

impl<'a> OutboundText<'a> {
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        Self { kind: NEW_TEXT, content }
    }
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /auth/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(deserialize_with = "deserialize_string_from_scalar")]
    pub user_id: String,
}

/// Failure body returned by the auth endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse a history payload, treating `null` and empty bodies as no messages.
///
/// # Errors
///
/// Returns the JSON error when the body is neither empty nor a message array.
pub fn parse_history(body: &str) -> Result<Vec<ChatMessage>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: Option<Vec<ChatMessage>> = serde_json::from_str(body)?;
    Ok(list.unwrap_or_default())
}

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}

/// Accept identifiers sent either as strings or as bare numbers.
fn deserialize_string_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        _ => Err(D::Error::custom("expected string or number")),
    }
}
