use super::*;
use crate::net::types::MessageKind;

fn message(kind: MessageKind, user_id: &str, username: &str) -> ChatMessage {
    ChatMessage {
        kind,
        message_id: 1,
        user_id: user_id.to_owned(),
        username: username.to_owned(),
        url: None,
        content: None,
    }
}

#[test]
fn own_text_message_is_self_aligned_and_labelled_you() {
    let msg: ChatMessage = serde_json::from_str(
        r#"{"type":"NEW_TEXT","message_id":1,"user_id":"u1","username":"alice","content":"hi"}"#,
    )
    .unwrap();
    let bubble = Bubble::new(&msg, Some("u1"));
    assert_eq!(bubble.alignment, Alignment::Own);
    assert_eq!(bubble.label, "You");
    assert_eq!(bubble.text.as_deref(), Some("hi"));
    assert!(bubble.image_url.is_none());
}

#[test]
fn other_users_message_uses_username() {
    let mut msg = message(MessageKind::NewText, "u2", "bob");
    msg.content = Some("yo".to_owned());
    let bubble = Bubble::new(&msg, Some("u1"));
    assert_eq!(bubble.alignment, Alignment::Other);
    assert_eq!(bubble.label, "bob");
    assert_eq!(bubble.to_string(), "bob -> yo");
}

#[test]
fn missing_username_falls_back_to_user_id() {
    let msg = message(MessageKind::NewImage, "u9", "");
    assert_eq!(Bubble::new(&msg, None).label, "u9");
}

#[test]
fn no_current_user_means_nothing_is_own() {
    let msg = message(MessageKind::NewText, "", "anon");
    assert_eq!(Bubble::new(&msg, None).alignment, Alignment::Other);
    assert_eq!(Bubble::new(&msg, Some("")).alignment, Alignment::Other);
}

#[test]
fn image_renders_url_whatever_the_type_says() {
    let mut msg = message(MessageKind::NewText, "u2", "bob");
    msg.url = Some("https://cdn/cat.png".to_owned());
    let bubble = Bubble::new(&msg, Some("u1"));
    assert_eq!(bubble.image_url.as_deref(), Some("https://cdn/cat.png"));
    assert_eq!(bubble.to_string(), "bob -> [image] https://cdn/cat.png");
}

#[test]
fn own_bubble_display_ends_with_label() {
    let mut msg = message(MessageKind::NewText, "u1", "alice");
    msg.content = Some("hi".to_owned());
    let line = Bubble::new(&msg, Some("u1")).to_string();
    assert!(line.trim_start().starts_with("hi"));
    assert!(line.ends_with("<- You"));
}
