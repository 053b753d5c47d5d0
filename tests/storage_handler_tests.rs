//! POST /api/upload through the router, with a recording mock store.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use blog_api::{create_router, storage::MockStorageService};
use serde_json::Value;
use tower::util::ServiceExt;

const BOUNDARY: &str = "X-BLOG-TEST-BOUNDARY";

/// One part of a multipart/form-data body.
fn part(name: &str, file_name: Option<&str>, content_type: Option<&str>, data: &str) -> String {
    let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", name);
    if let Some(file_name) = file_name {
        disposition.push_str(&format!("; filename=\"{}\"", file_name));
    }

    let mut part = format!("--{}\r\n{}\r\n", BOUNDARY, disposition);
    if let Some(content_type) = content_type {
        part.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    part.push_str(&format!("\r\n{}\r\n", data));
    part
}

fn form(parts: &[String]) -> String {
    format!("{}--{}--\r\n", parts.concat(), BOUNDARY)
}

fn upload_request(token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_stores_file_and_returns_url() {
    let storage = MockStorageService::new();
    let state = common::state_with_storage(storage.clone());
    let token = state.tokens.issue(1, "alice").unwrap();

    let body = form(&[
        part("caption", None, None, "ignored"),
        part("file", Some("notes.TXT"), Some("text/plain"), "hello world"),
    ]);
    let response = create_router(state)
        .oneshot(upload_request(Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], 200);

    let key = body["data"]["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("uploads/"));
    assert!(key.ends_with(".txt"));
    assert_eq!(
        body["data"]["url"],
        format!("http://localhost:9000/mock-bucket/{}", key)
    );

    let uploads = storage.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].key, key);
    assert_eq!(uploads[0].content_type, "text/plain");
    assert_eq!(uploads[0].size, "hello world".len());
}

#[tokio::test]
async fn test_upload_without_file_field_fails() {
    let storage = MockStorageService::new();
    let state = common::state_with_storage(storage.clone());
    let token = state.tokens.issue(1, "alice").unwrap();

    let body = form(&[part("avatar", Some("me.png"), Some("image/png"), "png")]);
    let response = create_router(state)
        .oneshot(upload_request(Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["status"], 5001);
    assert!(storage.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_reports_storage_failure() {
    let state = common::state_with_storage(MockStorageService::new_failing());
    let token = state.tokens.issue(1, "alice").unwrap();

    let body = form(&[part("file", Some("a.bin"), None, "data")]);
    let response = create_router(state)
        .oneshot(upload_request(Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["status"], 5001);
    assert_eq!(body["message"], "Upload failed");
}

#[tokio::test]
async fn test_upload_requires_token() {
    let storage = MockStorageService::new();
    let state = common::state_with_storage(storage.clone());

    let body = form(&[part("file", Some("a.txt"), Some("text/plain"), "data")]);
    let response = create_router(state)
        .oneshot(upload_request(None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], 1004);
    assert!(storage.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_non_multipart_body() {
    let state = common::test_state();
    let token = state.tokens.issue(1, "alice").unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = create_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["status"], 9001);
}
