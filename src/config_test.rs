use super::*;

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::default().with_base_url(base_url)
}

#[test]
fn ws_url_uses_plain_scheme_for_http_origin() {
    let cfg = config("http://localhost:8080");
    assert_eq!(cfg.ws_url("T1").unwrap(), "ws://localhost:8080/ws?token=T1");
}

#[test]
fn ws_url_uses_secure_scheme_for_https_origin() {
    let cfg = config("https://chat.example.com/");
    assert_eq!(cfg.ws_url("T1").unwrap(), "wss://chat.example.com/ws?token=T1");
}

#[test]
fn ws_url_percent_encodes_token() {
    let cfg = config("http://h");
    assert_eq!(cfg.ws_url("a b&c=d").unwrap(), "ws://h/ws?token=a+b%26c%3Dd");
}

#[test]
fn ws_url_rejects_unknown_scheme() {
    let cfg = config("ftp://h");
    assert!(matches!(cfg.ws_url("T1"), Err(ClientError::InvalidBaseUrl(url)) if url == "ftp://h"));
}

#[test]
fn endpoint_joins_without_double_slash() {
    let cfg = config("http://h:1/");
    assert_eq!(cfg.base_url, "http://h:1");
    assert_eq!(cfg.endpoint("/auth/login"), "http://h:1/auth/login");
}

#[test]
fn parse_retention_handles_zero_number_and_junk() {
    assert_eq!(parse_retention(Some("0")), None);
    assert_eq!(parse_retention(Some(" 25 ")), Some(25));
    assert_eq!(parse_retention(Some("lots")), Some(DEFAULT_LOG_RETENTION));
    assert_eq!(parse_retention(None), Some(DEFAULT_LOG_RETENTION));
}

#[test]
fn default_session_file_lives_under_app_dir() {
    let cfg = ClientConfig::default();
    assert!(cfg.session_file.ends_with("nexus-chat/session.json"));
    assert_eq!(cfg.log_retention, Some(DEFAULT_LOG_RETENTION));
}
