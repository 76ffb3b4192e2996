//! Resource wrappers against a recording mock API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use blog_platform::api::{ApiClient, ApiError, BlogResource, FilePart, Payload, UploadResource};

mod common;

fn client_for(addr: std::net::SocketAddr) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&format!("http://{}/api", addr), Duration::from_secs(10)).unwrap())
}

#[tokio::test]
async fn get_blog_by_id_issues_one_plain_get() {
    let (addr, log) = common::start_recording_backend(200, r#"{"id":"42","title":"Hello"}"#).await;
    let blogs = BlogResource::new(client_for(addr));

    let response = blogs.get_blog_by_id("42").await.unwrap();
    let blog: serde_json::Value = response.json().unwrap();
    assert_eq!(blog["title"], "Hello");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].method, Method::GET);
    assert_eq!(log[0].path, "/api/blogs/42");
    assert_eq!(log[0].query, None);
    assert!(log[0].body.is_empty());
}

#[tokio::test]
async fn blog_listing_endpoints() {
    let (addr, log) = common::start_recording_backend(200, "[]").await;
    let blogs = BlogResource::new(client_for(addr));

    blogs.get_blogs().await.unwrap();
    blogs.get_blogs_by_archives().await.unwrap();

    let paths: Vec<_> = log.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec!["/api/blogs", "/api/blogs/archives"]);
}

#[tokio::test]
async fn upload_img_posts_the_file() {
    let (addr, log) = common::start_recording_backend(201, r#"{"url":"/pictures/cat.png"}"#).await;
    let uploads = UploadResource::new(client_for(addr));

    let file = FilePart::new("cat.png", "image/png", b"\x89PNG-fake-bytes".to_vec());
    let response = uploads.upload_img(file).await.unwrap();
    assert_eq!(response.status.as_u16(), 201);

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].method, Method::POST);
    assert_eq!(log[0].path, "/api/uploads/pictures");

    let content_type = log[0].headers["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&log[0].body);
    assert!(body.contains("filename=\"cat.png\""));
    assert!(body.contains("PNG-fake-bytes"));
}

#[tokio::test]
async fn json_post_body() {
    let (addr, log) = common::start_recording_backend(200, "{}").await;
    let client = client_for(addr);

    client
        .post("/blogs", Payload::Json(serde_json::json!({"title": "draft"})))
        .await
        .unwrap();

    let log = log.lock().unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&log[0].body).unwrap();
    assert_eq!(sent["title"], "draft");
}

#[tokio::test]
async fn error_status_propagates() {
    let (addr, log) = common::start_recording_backend(404, "no such blog").await;
    let blogs = BlogResource::new(client_for(addr));

    let err = blogs.get_blog_by_id("missing").await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "no such blog");
        }
        other => panic!("unexpected error: {other}"),
    }
    // No retries
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let (addr, _log) = common::start_slow_backend(Duration::from_secs(2)).await;
    let client = Arc::new(
        ApiClient::new(&format!("http://{}", addr), Duration::from_millis(200)).unwrap(),
    );

    let err = BlogResource::new(client).get_blogs().await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = BlogResource::new(client_for(addr)).get_blogs().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
