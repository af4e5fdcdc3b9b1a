use super::*;

// =============================================================
// ChatMessage parsing
// =============================================================

#[test]
fn chat_message_parses_text_frame() {
    let raw = r#"{"type":"NEW_TEXT","message_id":1,"user_id":"u1","username":"alice","content":"hi"}"#;
    let msg: ChatMessage = serde_json::from_str(raw).unwrap();
    assert_eq!(msg.kind, MessageKind::NewText);
    assert_eq!(msg.message_id, 1);
    assert_eq!(msg.user_id, "u1");
    assert_eq!(msg.username, "alice");
    assert_eq!(msg.content.as_deref(), Some("hi"));
    assert!(msg.url.is_none());
}

#[test]
fn chat_message_parses_image_frame_with_numeric_user_id() {
    let raw = r#"{"type":"NEW_IMAGE","message_id":7.0,"user_id":42,"url":"https://cdn/x.png"}"#;
    let msg: ChatMessage = serde_json::from_str(raw).unwrap();
    assert_eq!(msg.kind, MessageKind::NewImage);
    assert_eq!(msg.message_id, 7);
    assert_eq!(msg.user_id, "42");
    assert_eq!(msg.username, "");
    assert_eq!(msg.url.as_deref(), Some("https://cdn/x.png"));
}

#[test]
fn chat_message_keeps_unknown_type() {
    let raw = r#"{"type":"USER_JOINED","message_id":3,"user_id":"u2","username":"bob"}"#;
    let msg: ChatMessage = serde_json::from_str(raw).unwrap();
    assert_eq!(msg.kind, MessageKind::Other("USER_JOINED".to_owned()));
}

#[test]
fn chat_message_does_not_validate_type_against_fields() {
    let raw = r#"{"type":"NEW_TEXT","message_id":4,"user_id":"u2","url":"https://cdn/y.png"}"#;
    let msg: ChatMessage = serde_json::from_str(raw).unwrap();
    assert_eq!(msg.kind, MessageKind::NewText);
    assert!(msg.content.is_none());
    assert_eq!(msg.url.as_deref(), Some("https://cdn/y.png"));
}

#[test]
fn chat_message_rejects_missing_message_id() {
    let raw = r#"{"type":"NEW_TEXT","user_id":"u1","content":"hi"}"#;
    assert!(serde_json::from_str::<ChatMessage>(raw).is_err());
}

#[test]
fn chat_message_serializes_type_field_and_skips_absent_payloads() {
    let msg = ChatMessage {
        kind: MessageKind::NewText,
        message_id: 9,
        user_id: "u1".to_owned(),
        username: "alice".to_owned(),
        url: None,
        content: Some("yo".to_owned()),
    };
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "NEW_TEXT");
    assert_eq!(value["content"], "yo");
    assert!(value.get("url").is_none());
}

// =============================================================
// Outbound + auth bodies
// =============================================================

#[test]
fn outbound_text_has_wire_shape() {
    let json = serde_json::to_string(&OutboundText::new("hello")).unwrap();
    assert_eq!(json, r#"{"type":"NEW_TEXT","content":"hello"}"#);
}

#[test]
fn login_response_parses_token_and_user_id() {
    let resp: LoginResponse = serde_json::from_str(r#"{"token":"T1","user_id":"u1"}"#).unwrap();
    assert_eq!(resp, LoginResponse { token: "T1".to_owned(), user_id: "u1".to_owned() });
}

#[test]
fn error_body_tolerates_missing_message() {
    let body: ErrorBody = serde_json::from_str("{}").unwrap();
    assert!(body.message.is_none());
}

// =============================================================
// History payloads
// =============================================================

#[test]
fn parse_history_treats_null_and_empty_as_no_messages() {
    assert!(parse_history("").unwrap().is_empty());
    assert!(parse_history("null").unwrap().is_empty());
    assert!(parse_history("[]").unwrap().is_empty());
}

#[test]
fn parse_history_keeps_order() {
    let body = r#"[
        {"type":"NEW_TEXT","message_id":2,"user_id":"u1","username":"alice","content":"b"},
        {"type":"NEW_TEXT","message_id":1,"user_id":"u1","username":"alice","content":"a"}
    ]"#;
    let list = parse_history(body).unwrap();
    let ids: Vec<i64> = list.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn parse_history_rejects_non_array() {
    assert!(parse_history(r#"{"messages":[]}"#).is_err());
}
