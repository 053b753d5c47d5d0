use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod password;
pub mod policy;
pub mod repository;
pub mod response;
pub mod storage;
pub mod token;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use error::ApiError;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, Repository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};
pub use token::TokenService;

/// ApiDoc
///
/// Auto-generated OpenAPI document, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::create_user, handlers::users::get_user, handlers::users::list_users,
        handlers::users::search_users, handlers::users::update_user,
        handlers::users::update_password,
        handlers::users::delete_user, handlers::users::login,
        handlers::articles::create_article, handlers::articles::get_article,
        handlers::articles::list_articles, handlers::articles::list_articles_by_category,
        handlers::articles::list_articles_by_title, handlers::articles::update_article,
        handlers::articles::delete_article,
        handlers::categories::create_category, handlers::categories::get_category,
        handlers::categories::list_categories, handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::comments::create_comment, handlers::comments::get_comment,
        handlers::comments::list_comments, handlers::comments::list_comments_by_article,
        handlers::comments::update_comment, handlers::comments::delete_comment,
        handlers::upload::upload_file,
    ),
    components(
        schemas(
            models::User, models::UserSummary, models::CategoryRef, models::ArticleSummary,
            models::Article, models::Category, models::Comment,
            models::CreateUserRequest, models::UpdateUserRequest, models::UpdatePasswordRequest,
            models::LoginRequest, models::LoginResponse,
            models::CreateArticleRequest, models::UpdateArticleRequest,
            models::CreateCategoryRequest, models::UpdateCategoryRequest,
            models::CreateCommentRequest, models::UpdateCommentRequest, models::UploadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "blog-api", description = "Blog backend: articles, categories, comments and users")
    )
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The single, immutable container holding every application service, shared
/// across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: the entity store (Postgres or in-memory).
    pub repo: RepositoryState,
    /// Storage Layer: S3/MinIO object storage for uploads.
    pub storage: StorageState,
    /// Token Service: issues tokens at login and verifies them at the gate.
    pub tokens: TokenService,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Assembles the state, deriving the token service from the JWT settings of `config`.
    pub fn new(repo: RepositoryState, storage: StorageState, config: AppConfig) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            chrono::Duration::hours(config.jwt_ttl_hours),
        );

        Self {
            repo,
            storage,
            tokens,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Let handlers and extractors pull single components out of the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> TokenService {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// The Authorization Gate for `authenticated_routes`. Verifies the bearer token and
/// stores the resulting `AuthUser` in the request extensions. On any failure the
/// request is answered with the authentication error and the handler never runs.
async fn auth_middleware(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = auth::authenticate(request.headers(), &tokens)?;
    tracing::debug!(user_id = user.id, "request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No middleware applied.
        .merge(public::public_routes())
        // Authenticated Routes: Protected by the `auth_middleware`.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, tagged with the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: HTTP method, URI and the `x-request-id` header,
/// so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
