//! Client-side state: durable session, message log, and auth-screen mode.

pub mod auth;
pub mod log;
pub mod session;
