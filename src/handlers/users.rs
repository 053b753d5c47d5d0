use axum::extract::State;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::{
        CreateUserRequest, LoginRequest, LoginResponse, NewUser, UpdatePasswordRequest,
        UpdateUserRequest, User, UserChanges,
    },
    pagination::PageParams,
    password,
    policy::{UserTarget, authorize},
    repository::{UserRepository, check_email, check_password, check_username},
    response::{ApiResponse, ApiResult},
};

/// Hashes a plaintext password, refusing an empty one first so it is reported as
/// such rather than hashed into a non-empty digest.
fn digest_of(plain: &str) -> Result<String, ApiError> {
    check_password(plain)?;
    password::hash(plain)
}

/// create_user
///
/// [Public Route] Registers a new user. Field checks run in the order
/// username, email, password; uniqueness is checked by the store.
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created", body = ApiResponse<User>),
        (status = 400, description = "Empty or invalid field"),
        (status = 500, description = "Username or email already used")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<User> {
    check_username(&payload.username)?;
    check_email(&payload.email)?;

    let user = state
        .repo
        .create_user(NewUser {
            password_digest: digest_of(&payload.password)?,
            username: payload.username,
            email: payload.email,
        })
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(ApiResponse::ok(user))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses((status = 200, description = "Found", body = ApiResponse<User>))
)]
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<User> {
    Ok(ApiResponse::ok(state.repo.get_user(id).await?))
}

/// list_users
///
/// [Public Route] Newest users first, paginated.
#[utoipa::path(
    get,
    path = "/api/users",
    params(PageParams),
    responses((status = 200, description = "Users", body = ApiResponse<Vec<User>>))
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<User>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(state.repo.list_users(page).await?))
}

/// search_users
///
/// [Public Route] Case-insensitive substring search on the username.
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username fragment"), PageParams),
    responses((status = 200, description = "Matching users", body = ApiResponse<Vec<User>>))
)]
pub async fn search_users(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<User>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(state.repo.search_users(&username, page).await?))
}

/// update_user
///
/// [Authenticated Route] Partial profile update.
///
/// *Authorization*: a user may only modify their own record. The check runs before
/// anything is read or written.
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the same user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<User> {
    authorize(&user, &UserTarget(id))?;

    let password_digest = payload.password.as_deref().map(digest_of).transpose()?;
    let updated = state
        .repo
        .update_user(
            id,
            UserChanges {
                username: payload.username,
                email: payload.email,
                password_digest,
            },
        )
        .await?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    put,
    path = "/api/user/{id}/password",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 403, description = "Not the same user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdatePasswordRequest>,
) -> ApiResult<()> {
    authorize(&user, &UserTarget(id))?;

    state.repo.update_password(id, digest_of(&payload.password)?).await?;
    Ok(ApiResponse::empty())
}

/// delete_user
///
/// [Authenticated Route] Deletes the caller's own account and every comment they wrote.
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the same user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    authorize(&user, &UserTarget(id))?;

    state.repo.delete_user(id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(ApiResponse::empty())
}

/// login
///
/// [Public Route] Exchanges a username and password for a signed identity token.
/// Stamps the user's last-login time on success.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 500, description = "Unknown user or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let credentials = state.repo.get_credentials(&payload.username).await?;

    if !password::verify(&credentials.password_digest, &payload.password) {
        tracing::debug!(user_id = credentials.id, "login rejected: wrong password");
        return Err(ApiError::PasswordWrong);
    }

    let token = state
        .tokens
        .issue(credentials.id, &credentials.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state.repo.record_login(credentials.id).await?;
    let user = state.repo.get_user(credentials.id).await?;

    Ok(ApiResponse::ok(LoginResponse { token, user }))
}
