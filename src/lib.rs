//! Client library for the Nexus Chat service.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`client::SessionClient`] owns one authenticated chat session: the token
//! (restored from an injected [`state::session::SessionStore`]), at most one
//! live websocket connection, and the in-memory [`state::log::MessageLog`]
//! that mirrors inbound events. REST calls live in [`net::api`], the socket
//! lifecycle in [`net::socket`], and the shared wire schema in [`net::types`].

pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod state;
pub mod util;

pub use client::SessionClient;
pub use config::ClientConfig;
pub use error::ClientError;
