//! Session client: one authenticated chat session end to end.
//!
//! SYSTEM CONTEXT
//! ==============
//! The client caches the [`Session`] loaded from its injected store, owns the
//! live [`ConnectionManager`] and the [`MessageLog`], and gates send/upload
//! on holding a token. Whenever the token changes (login, logout) the old
//! connection and log are discarded; login then reloads history and
//! reconnects for the new token.
//!
//! ERROR HANDLING
//! ==============
//! Auth failures are returned untouched and never mutate session state.
//! History and upload failures are logged here and then returned so callers
//! may ignore them. Sending without an open connection is a silent no-op.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{RwLock, broadcast, watch};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::api::{ApiClient, UploadFile};
use crate::net::socket::{ConnectionManager, ConnectionStatus};
use crate::net::types::{ChatMessage, OutboundText};
use crate::state::auth::{AuthMode, SessionPhase};
use crate::state::log::MessageLog;
use crate::state::session::{Session, SessionStore};

pub struct SessionClient {
    api: ApiClient,
    store: Box<dyn SessionStore>,
    session: Session,
    mode: AuthMode,
    log: Arc<RwLock<MessageLog>>,
    connection: ConnectionManager,
}

impl SessionClient {
    /// Build a client and restore any stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the store
    /// cannot be read.
    pub fn new(config: ClientConfig, store: Box<dyn SessionStore>) -> Result<Self, ClientError> {
        let session = store.load()?;
        let log = Arc::new(RwLock::new(MessageLog::new(config.log_retention)));
        let connection = ConnectionManager::new(Duration::from_secs(config.connect_timeout_secs));
        let api = ApiClient::new(config)?;

        if session.is_authenticated() {
            tracing::debug!(user_id = session.user_id().unwrap_or_default(), "restored stored session");
        }

        Ok(Self { api, store, session, mode: AuthMode::default(), log, connection })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from_parts(self.session.is_authenticated(), self.connection.status())
    }

    /// Snapshot of the message log in display order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.log.read().await.snapshot()
    }

    #[must_use]
    pub fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage> {
        self.connection.subscribe_messages()
    }

    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.subscribe_status()
    }

    /// Log in and bring the session live: the token is persisted, the old
    /// connection and log are discarded, then history is loaded and the
    /// connection opened for the new token. History and connect failures are
    /// logged and show up in the returned phase.
    ///
    /// # Errors
    ///
    /// [`ClientError::Auth`] with the server message on rejection, or a
    /// network/store error. Session state is unchanged on failure.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<SessionPhase, ClientError> {
        self.authenticate(username, password).await?;
        Ok(self.start().await)
    }

    /// Swap in a new token without going live. The old connection and log
    /// are discarded; nothing is reopened until [`Self::start`] or
    /// [`Self::connect`] runs.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login`].
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<&Session, ClientError> {
        let resp = self.api.login(username, password).await?;
        let session = Session::new(resp.token, resp.user_id);
        self.store.save(&session)?;

        self.reset_live_state().await;
        self.session = session;
        tracing::info!(user_id = self.session.user_id().unwrap_or_default(), "logged in");
        Ok(&self.session)
    }

    /// Create an account. Does not log in; flips the form back to login mode.
    ///
    /// # Errors
    ///
    /// [`ClientError::Auth`] with the server message on rejection, or a
    /// network error.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        self.api.register(username, password).await?;
        self.mode = AuthMode::Login;
        tracing::info!(%username, "registered");
        Ok(())
    }

    /// Drop the session everywhere: store, memory, connection, and log.
    ///
    /// The in-memory state is cleared even if the store cannot be.
    ///
    /// # Errors
    ///
    /// Returns the store error, if any.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let cleared = self.store.clear();
        self.session = Session::default();
        self.reset_live_state().await;
        tracing::info!("logged out");
        cleared
    }

    /// Open the live connection for the current token.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a token, otherwise the
    /// connect error. No retry is attempted.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        let url = self.api.config().ws_url(token)?;
        self.connection.open(&url, Arc::clone(&self.log)).await
    }

    pub async fn disconnect(&mut self) {
        self.connection.close().await;
    }

    /// Send a text message over the live connection.
    ///
    /// Returns `true` if a frame was queued. Blank content and a missing
    /// connection both return `false`. The message is not echoed locally;
    /// it appears once the server pushes it back.
    pub fn send_text(&self, content: &str) -> bool {
        if content.trim().is_empty() {
            return false;
        }
        self.connection.send_json(&OutboundText::new(content))
    }

    /// Upload an image with bearer auth. The server announces it over the
    /// live connection; nothing is added to the log here.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a token (no request is
    /// made), otherwise the upload error.
    pub async fn upload_image(&self, file: UploadFile) -> Result<Value, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        let file_name = file.file_name.clone();
        match self.api.upload(token, file).await {
            Ok(result) => {
                tracing::info!(%file_name, %result, "upload complete");
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(%file_name, %error, "upload failed");
                Err(error)
            }
        }
    }

    /// Replace the log with the server's history.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a token, otherwise the fetch
    /// error. The log is left untouched on failure.
    pub async fn load_history(&self) -> Result<usize, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        match self.api.fetch_messages(token).await {
            Ok(messages) => {
                let count = messages.len();
                self.log.write().await.replace(messages);
                tracing::debug!(count, "history loaded");
                Ok(count)
            }
            Err(error) => {
                tracing::warn!(%error, "history fetch failed");
                Err(error)
            }
        }
    }

    /// Start the session the way a chat view does on mount: load history,
    /// then open the live connection. Failures are logged, not returned.
    pub async fn start(&mut self) -> SessionPhase {
        if !self.session.is_authenticated() {
            return self.phase();
        }
        let _ = self.load_history().await;
        if let Err(error) = self.connect().await {
            tracing::warn!(%error, "live connection failed");
        }
        self.phase()
    }

    async fn reset_live_state(&mut self) {
        self.connection.close().await;
        self.log.write().await.clear();
    }
}
