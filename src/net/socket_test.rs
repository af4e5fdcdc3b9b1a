use super::*;

fn manager() -> ConnectionManager {
    ConnectionManager::new(Duration::from_millis(500))
}

#[test]
fn parse_inbound_accepts_chat_frame() {
    let msg = parse_inbound(r#"{"type":"NEW_TEXT","message_id":1,"user_id":"u1","username":"alice","content":"hi"}"#)
        .unwrap();
    assert_eq!(msg.content.as_deref(), Some("hi"));
}

#[test]
fn parse_inbound_rejects_garbage() {
    assert!(parse_inbound("not json").is_err());
    assert!(parse_inbound(r#"{"type":"NEW_TEXT"}"#).is_err());
}

#[tokio::test]
async fn handle_inbound_text_appends_and_broadcasts() {
    let log = RwLock::new(MessageLog::new(None));
    let (tx, mut rx) = broadcast::channel(4);

    handle_inbound_text(r#"{"type":"NEW_TEXT","message_id":1,"user_id":"u1","content":"a"}"#, &log, &tx).await;
    handle_inbound_text(r#"{"type":"NEW_TEXT","message_id":1,"user_id":"u1","content":"b"}"#, &log, &tx).await;

    assert_eq!(log.read().await.len(), 2);
    assert_eq!(rx.recv().await.unwrap().content.as_deref(), Some("a"));
    assert_eq!(rx.recv().await.unwrap().content.as_deref(), Some("b"));
}

#[tokio::test]
async fn handle_inbound_text_drops_malformed_frame_only() {
    let log = RwLock::new(MessageLog::new(None));
    let (tx, _rx) = broadcast::channel(4);

    handle_inbound_text("{oops", &log, &tx).await;
    handle_inbound_text(r#"{"type":"NEW_IMAGE","message_id":2,"user_id":"u2","url":"x"}"#, &log, &tx).await;

    let log = log.read().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log.iter().next().unwrap().message_id, 2);
}

#[test]
fn new_manager_is_idle() {
    assert_eq!(manager().status(), ConnectionStatus::Idle);
}

#[test]
fn send_without_connection_is_dropped() {
    let m = manager();
    assert!(!m.send_json(&serde_json::json!({"type": "NEW_TEXT", "content": "hi"})));
}

#[tokio::test]
async fn close_is_idempotent_without_connection() {
    let mut m = manager();
    m.close().await;
    m.close().await;
    assert_eq!(m.status(), ConnectionStatus::Idle);
}

#[tokio::test]
async fn failed_open_ends_closed_then_close_settles_idle() {
    let mut m = manager();
    let mut status = m.subscribe_status();
    let log = Arc::new(RwLock::new(MessageLog::default()));

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = m.open(&format!("ws://127.0.0.1:{port}/ws?token=T"), log).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(m.status(), ConnectionStatus::Closed);
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), ConnectionStatus::Closed);

    m.close().await;
    assert_eq!(m.status(), ConnectionStatus::Idle);
}
