//! Networking modules for HTTP + websocket chat transport.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `socket` manages the live connection lifecycle,
//! and `types` defines the shared wire schema.

pub mod api;
pub mod socket;
pub mod types;
