//! Live chat connection manager.
//!
//! The manager owns at most one websocket and walks it through
//! `Idle -> Connecting -> Open -> Closed -> Idle`. A single spawned task
//! forwards outbound frames and appends inbound chat events to the shared
//! [`MessageLog`]. UI layers follow along through [`ConnectionManager::subscribe_status`]
//! and [`ConnectionManager::subscribe_messages`] instead of owning the socket.
//!
//! ERROR HANDLING
//! ==============
//! A malformed inbound frame is logged and only that event is dropped. A
//! closed or failed transport moves the status to `Closed`; nothing
//! reconnects on its own.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{RwLock, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::types::ChatMessage;
use crate::error::ClientError;
use crate::state::log::MessageLog;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const MESSAGE_CHANNEL_CAPACITY: usize = 256;
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Live connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection has been opened, or the last one was torn down.
    #[default]
    Idle,
    /// Websocket handshake is in progress.
    Connecting,
    /// Frames flow in both directions.
    Open,
    /// The peer closed or the transport failed. No retry follows.
    Closed,
}

struct LiveSocket {
    outbound: mpsc::UnboundedSender<Message>,
    task: JoinHandle<()>,
}

pub struct ConnectionManager {
    status: Arc<watch::Sender<ConnectionStatus>>,
    inbound: broadcast::Sender<ChatMessage>,
    connect_timeout: Duration,
    live: Option<LiveSocket>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new(connect_timeout: Duration) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Idle);
        let (inbound, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        Self { status: Arc::new(status), inbound, connect_timeout, live: None }
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Every inbound chat event, after it has been appended to the log.
    #[must_use]
    pub fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage> {
        self.inbound.subscribe()
    }

    /// Open the live connection, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WsConnect`] if the handshake fails and
    /// [`ClientError::Timeout`] if it does not finish in time. The status is
    /// `Closed` afterwards in both cases.
    pub async fn open(&mut self, url: &str, log: Arc<RwLock<MessageLog>>) -> Result<(), ClientError> {
        self.close().await;
        self.status.send_replace(ConnectionStatus::Connecting);

        let stream = match tokio::time::timeout(self.connect_timeout, connect_async(url)).await {
            Ok(Ok((stream, _))) => stream,
            Ok(Err(error)) => {
                self.status.send_replace(ConnectionStatus::Closed);
                return Err(error.into());
            }
            Err(_) => {
                self.status.send_replace(ConnectionStatus::Closed);
                return Err(ClientError::Timeout);
            }
        };

        tracing::info!("connected to chat hub");
        self.status.send_replace(ConnectionStatus::Open);

        let (outbound, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(stream, rx, log, Arc::clone(&self.status), self.inbound.clone()));
        self.live = Some(LiveSocket { outbound, task });
        Ok(())
    }

    /// Serialize `frame` and queue it for sending.
    ///
    /// Returns `false` without sending when the connection is not open.
    pub fn send_json<T: Serialize>(&self, frame: &T) -> bool {
        if self.status() != ConnectionStatus::Open {
            return false;
        }
        let Some(live) = &self.live else {
            return false;
        };
        let json = match serde_json::to_string(frame) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "failed to encode outbound frame");
                return false;
            }
        };
        live.outbound.send(Message::Text(json.into())).is_ok()
    }

    /// Close the live connection and settle in `Idle`. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(LiveSocket { outbound, mut task }) = self.live.take() {
            // Dropping the sender lets the task flush queued frames and send Close.
            drop(outbound);
            if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                task.abort();
            }
            tracing::debug!("chat connection torn down");
        }
        self.status.send_replace(ConnectionStatus::Idle);
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            live.task.abort();
        }
    }
}

async fn run_socket(
    stream: WsStream,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    log: Arc<RwLock<MessageLog>>,
    status: Arc<watch::Sender<ConnectionStatus>>,
    inbound: broadcast::Sender<ChatMessage>,
) {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            next = outbound.recv() => {
                let Some(message) = next else {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                };
                if let Err(error) = write.send(message).await {
                    tracing::warn!(%error, "websocket send failed");
                    break;
                }
            }
            next = read.next() => match next {
                Some(Ok(Message::Text(text))) => handle_inbound_text(text.as_str(), &log, &inbound).await,
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("chat connection closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(%error, "websocket receive failed");
                    break;
                }
            }
        }
    }

    status.send_replace(ConnectionStatus::Closed);
}

/// Parse one inbound text frame into a chat event.
pub(crate) fn parse_inbound(text: &str) -> Result<ChatMessage, serde_json::Error> {
    serde_json::from_str(text)
}

pub(crate) async fn handle_inbound_text(
    text: &str,
    log: &RwLock<MessageLog>,
    inbound: &broadcast::Sender<ChatMessage>,
) {
    match parse_inbound(text) {
        Ok(message) => {
            tracing::debug!(message_id = message.message_id, user_id = %message.user_id, "inbound chat message");
            log.write().await.push(message.clone());
            // No subscribers is fine; the log already has the event.
            let _ = inbound.send(message);
        }
        Err(error) => tracing::warn!(%error, "dropping malformed chat frame"),
    }
}
