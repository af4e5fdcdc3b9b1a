//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Three families matter to callers: auth rejections carry a server message
//! meant for the user, network failures collapse to a generic notice, and
//! parse failures are logged where they happen. Store and precondition errors
//! round out the set so every fallible path returns `ClientError`.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Generic notice shown for transport-level failures.
pub const NETWORK_ERROR_NOTICE: &str = "Network error, please try again.";

/// Error type for session client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected a login or register request.
    #[error("{message}")]
    Auth { status: u16, message: String },
    /// The operation needs a session token and none is present.
    #[error("not logged in")]
    NotAuthenticated,
    /// The base URL cannot be mapped to HTTP endpoints or a socket URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// An HTTP request failed before a response arrived.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status { status: u16 },
    /// The websocket handshake failed.
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    /// The websocket handshake did not finish in time.
    #[error("timed out opening websocket")]
    Timeout,
    /// A JSON payload could not be parsed or produced.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Reading or writing local files failed.
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Text suitable for a blocking user-facing notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth { message, .. } => message.clone(),
            Self::Http(_) | Self::Status { .. } | Self::WsConnect(_) | Self::Timeout => NETWORK_ERROR_NOTICE.to_owned(),
            other => other.to_string(),
        }
    }

    /// True for transport failures (as opposed to rejections or local faults).
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::WsConnect(_) | Self::Timeout)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}
