//! Auth-screen mode and session phase.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends render either the login/register form or the chat view from
//! these two values; neither carries transport state of its own.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::socket::ConnectionStatus;

/// Which credential form is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Session-level lifecycle position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    /// A token is held; the live connection is in the given state.
    LoggedIn(ConnectionStatus),
}

impl SessionPhase {
    #[must_use]
    pub fn from_parts(authenticated: bool, connection: ConnectionStatus) -> Self {
        if authenticated { Self::LoggedIn(connection) } else { Self::LoggedOut }
    }
}
