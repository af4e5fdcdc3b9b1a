//! In-memory chat log for the current session.
//!
//! Insertion order is display order. Entries are never deduplicated by
//! `message_id`; a redelivered message shows up twice. The retention limit
//! evicts from the front so the newest messages survive.

#[cfg(test)]
#[path = "log_test.rs"]
mod log_test;

use std::collections::VecDeque;

use crate::net::types::ChatMessage;

#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: VecDeque<ChatMessage>,
    retention: Option<usize>,
}

impl MessageLog {
    /// Create a log keeping at most `retention` messages. `None` and
    /// `Some(0)` are both unbounded.
    #[must_use]
    pub fn new(retention: Option<usize>) -> Self {
        Self { messages: VecDeque::new(), retention: retention.filter(|&n| n > 0) }
    }

    #[must_use]
    pub fn retention(&self) -> Option<usize> {
        self.retention
    }

    /// Append one inbound message, evicting the oldest beyond the limit.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        self.enforce_retention();
    }

    /// Replace the whole log with `messages`. Never merges.
    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages.into();
        self.enforce_retention();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Owned copy in display order, for render paths.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    fn enforce_retention(&mut self) {
        let Some(limit) = self.retention else {
            return;
        };
        let excess = self.messages.len().saturating_sub(limit);
        if excess > 0 {
            self.messages.drain(..excess);
        }
    }
}
