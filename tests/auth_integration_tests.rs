mod common;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, header},
};
use blog_api::{
    auth::{AuthError, AuthUser, authenticate, bearer_token},
    create_router,
    error::ApiError,
    repository::ArticleRepository,
    token::{Claims, TokenError, TokenService},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const ISSUER: &str = "blog-api";

fn service() -> TokenService {
    TokenService::new(SECRET, ISSUER, Duration::hours(72))
}

fn headers_with(value: &str) -> axum::http::HeaderMap {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value.parse().unwrap());
    headers
}

// --- Token lifecycle ---

#[test]
fn test_issue_then_verify_returns_identity() {
    let tokens = service();
    let token = tokens.issue(42, "alice").unwrap();

    let identity = tokens.verify(&token).unwrap();
    assert_eq!(identity.user_id, 42);
    assert_eq!(identity.username, "alice");
}

#[test]
fn test_expired_token_is_rejected() {
    let expired = TokenService::new(SECRET, ISSUER, Duration::hours(-1));
    let token = expired.issue(1, "late").unwrap();

    assert_eq!(service().verify(&token), Err(TokenError::ExpiredToken));
}

#[test]
fn test_token_from_other_secret_has_invalid_signature() {
    let foreign = TokenService::new("another-secret", ISSUER, Duration::hours(1));
    let token = foreign.issue(1, "mallory").unwrap();

    assert_eq!(service().verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_other_algorithm_is_a_mismatch() {
    let now = Utc::now();
    let claims = Claims {
        user_id: 1,
        username: "alice".into(),
        iss: ISSUER.into(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(service().verify(&token), Err(TokenError::AlgorithmMismatch));
}

#[test]
fn test_garbage_is_malformed() {
    assert_eq!(service().verify("not-a-token"), Err(TokenError::MalformedToken));
    assert_eq!(service().verify("a.b.c"), Err(TokenError::MalformedToken));
}

#[test]
fn test_foreign_issuer_is_rejected() {
    let other = TokenService::new(SECRET, "someone-else", Duration::hours(1));
    let token = other.issue(1, "alice").unwrap();

    assert!(service().verify(&token).is_err());
}

// --- Bearer extraction ---

#[test]
fn test_bearer_token_requires_exact_scheme() {
    assert_eq!(bearer_token(&headers_with("Bearer abc")), Ok("abc"));

    for bad in ["Bearer", "Bearer ", "bearer abc", "Basic abc", "Bearer  abc", "Token abc"] {
        assert_eq!(
            bearer_token(&headers_with(bad)),
            Err(AuthError::MissingCredentials),
            "accepted {bad:?}"
        );
    }

    assert_eq!(
        bearer_token(&axum::http::HeaderMap::new()),
        Err(AuthError::MissingCredentials)
    );
}

#[test]
fn test_authenticate_maps_claims_to_auth_user() {
    let tokens = service();
    let token = tokens.issue(7, "bob").unwrap();

    let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();
    assert_eq!(
        user,
        AuthUser {
            id: 7,
            username: "bob".into()
        }
    );
}

// --- AuthUser extractor ---

#[tokio::test]
async fn test_extractor_verifies_token_against_state() {
    let state = common::test_state();
    let token = state.tokens.issue(5, "carol").unwrap();

    let (mut parts, _) = Request::builder()
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(())
        .unwrap()
        .into_parts();

    let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(user.id, 5);
    // The identity is cached for later extractors of the same request.
    assert_eq!(parts.extensions.get::<AuthUser>(), Some(&user));
}

#[tokio::test]
async fn test_extractor_rejects_expired_token() {
    let state = common::test_state();
    let expired = TokenService::new(
        &state.config.jwt_secret,
        state.config.jwt_issuer.clone(),
        Duration::hours(-1),
    );
    let token = expired.issue(5, "carol").unwrap();

    let (mut parts, _) = Request::builder()
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(())
        .unwrap()
        .into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert!(matches!(
        result,
        Err(ApiError::Unauthorized(AuthError::Token(TokenError::ExpiredToken)))
    ));
}

// --- Gate on the router ---

async fn envelope(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_gate_rejects_missing_token_before_handler_runs() {
    let state = common::test_state();
    let post = state.repo.create_article(common::article("keep me")).await.unwrap();
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/article/{}", post.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = envelope(response).await;
    assert_eq!(body["status"], 1004);
    assert_eq!(body["message"], "Token is wrong");
    assert!(body["data"].is_null());

    assert!(state.repo.get_article(post.id).await.is_ok());
}

#[tokio::test]
async fn test_gate_rejects_tampered_token() {
    let state = common::test_state();
    let token = state.tokens.issue(1, "alice").unwrap();
    let tampered = format!("{}x", token);

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/category")
                .header(header::AUTHORIZATION, format!("Bearer {}", tampered))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"rust"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(envelope(response).await["status"], 1004);
}

#[tokio::test]
async fn test_gate_passes_valid_token() {
    let state = common::test_state();
    let token = state.tokens.issue(1, "alice").unwrap();

    let response = create_router(state.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/category")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"rust"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = envelope(response).await;
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"]["name"], "rust");
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let state = common::test_state();
    let user = common::seed_user(state.repo.as_ref(), "pub").await;

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .uri(format!("/api/user/{}", user.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(envelope(response).await["data"]["username"], user.username);
}
