use super::*;

#[test]
fn bearer_formats_authorization_value() {
    assert_eq!(bearer("T1"), "Bearer T1");
}

#[test]
fn auth_error_prefers_server_message() {
    let err = auth_error(StatusCode::UNAUTHORIZED, r#"{"message":"Invalid credentials"}"#);
    assert!(matches!(err, ClientError::Auth { status: 401, ref message } if message == "Invalid credentials"));
}

#[test]
fn auth_error_falls_back_when_body_has_no_message() {
    let err = auth_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
    assert_eq!(err.user_message(), "authentication failed (HTTP 500)");

    let err = auth_error(StatusCode::CONFLICT, r#"{"message":"  "}"#);
    assert_eq!(err.user_message(), "authentication failed (HTTP 409)");
}

#[test]
fn guess_mime_maps_image_extensions() {
    assert_eq!(guess_mime("cat.PNG"), "image/png");
    assert_eq!(guess_mime("a.b.jpeg"), "image/jpeg");
    assert_eq!(guess_mime("clip.webp"), "image/webp");
    assert_eq!(guess_mime("noext"), "application/octet-stream");
}

#[test]
fn upload_file_new_derives_mime_from_name() {
    let file = UploadFile::new("photo.gif", vec![1, 2, 3]);
    assert_eq!(file.mime, "image/gif");
    assert_eq!(file.bytes.len(), 3);
}

#[tokio::test]
async fn upload_file_from_path_reads_bytes_and_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.jpg");
    std::fs::write(&path, b"jpeg-bytes").unwrap();

    let file = UploadFile::from_path(&path).await.unwrap();
    assert_eq!(file.file_name, "pic.jpg");
    assert_eq!(file.mime, "image/jpeg");
    assert_eq!(file.bytes, b"jpeg-bytes");
}

#[tokio::test]
async fn upload_file_from_missing_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = UploadFile::from_path(&dir.path().join("missing.png")).await.unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}
