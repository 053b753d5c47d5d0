use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that need no token. Nothing here mutates a resource owned by a
/// specific user except comment creation, which takes its author from the payload.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // --- Users ---
        .route("/api/user", post(handlers::create_user))
        .route("/api/user/{id}", get(handlers::get_user))
        .route("/api/users", get(handlers::list_users))
        // Substring search on the username, paginated.
        .route("/api/users/{username}", get(handlers::search_users))
        .route("/api/login", post(handlers::login))
        // --- Articles ---
        .route("/api/article/{id}", get(handlers::get_article))
        .route("/api/articles", get(handlers::list_articles))
        .route(
            "/api/articles/category/{id}",
            get(handlers::list_articles_by_category),
        )
        // Title substring search; the static `category` segment above takes precedence.
        .route("/api/articles/{title}", get(handlers::list_articles_by_title))
        // --- Categories ---
        .route("/api/category/{id}", get(handlers::get_category))
        .route("/api/categories", get(handlers::list_categories))
        // --- Comments ---
        .route("/api/comment", post(handlers::create_comment))
        .route("/api/comment/{id}", get(handlers::get_comment))
        .route("/api/comments", get(handlers::list_comments))
        .route(
            "/api/comments/article/{id}",
            get(handlers::list_comments_by_article),
        )
}
