//! Presentation model for one chat message.
//!
//! Own messages are aligned to the viewer's side and labelled "You"; others
//! carry the author's name. The body shows whichever payload arrived, without
//! checking it against the message type.

#[cfg(test)]
#[path = "bubble_test.rs"]
mod bubble_test;

use std::fmt;

use crate::net::types::ChatMessage;

pub const SELF_LABEL: &str = "You";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Message written by the current user.
    Own,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bubble {
    pub alignment: Alignment,
    pub label: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

impl Bubble {
    #[must_use]
    pub fn new(message: &ChatMessage, current_user: Option<&str>) -> Self {
        let own = current_user.is_some_and(|user| !user.is_empty() && user == message.user_id);
        let (alignment, label) = if own {
            (Alignment::Own, SELF_LABEL.to_owned())
        } else if message.username.is_empty() {
            (Alignment::Other, message.user_id.clone())
        } else {
            (Alignment::Other, message.username.clone())
        };

        Self {
            alignment,
            label,
            text: message.content.clone().filter(|c| !c.is_empty()),
            image_url: message.url.clone().filter(|u| !u.is_empty()),
        }
    }
}

impl fmt::Display for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = Vec::with_capacity(2);
        if let Some(text) = &self.text {
            body.push(text.clone());
        }
        if let Some(url) = &self.image_url {
            body.push(format!("[image] {url}"));
        }
        let body = body.join(" ");

        match self.alignment {
            Alignment::Own => write!(f, "{:>40} <- {}", body, self.label),
            Alignment::Other => write!(f, "{} -> {}", self.label, body),
        }
    }
}
