use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{post, put},
};

/// Largest accepted upload body.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Authenticated Router Module
///
/// Every route here sits behind the gate layered on in `create_router`, so handlers
/// always receive a verified `AuthUser`.
///
/// Access Control Strategy:
/// user routes are self-only and comment mutations are author-only; both checks run
/// in the handler through `policy::authorize` before the store is touched.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // PUT/DELETE /api/user/{id}
        // Self-only: the path id must be the caller's own id.
        .route(
            "/api/user/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/api/user/{id}/password", put(handlers::update_password))
        // --- Articles ---
        .route("/api/article", post(handlers::create_article))
        .route(
            "/api/article/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        // --- Categories ---
        .route("/api/category", post(handlers::create_category))
        .route(
            "/api/category/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        // PUT/DELETE /api/comment/{id}
        // Author-only: the owner is looked up in the store, never read from the payload.
        .route(
            "/api/comment/{id}",
            put(handlers::update_comment).delete(handlers::delete_comment),
        )
        // POST /api/upload
        // Multipart form, field `file`; the object is streamed to S3-compatible storage.
        .route(
            "/api/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
