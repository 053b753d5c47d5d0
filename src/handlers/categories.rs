use axum::extract::State;

use crate::{
    AppState,
    auth::AuthUser,
    extract::{ApiJson, ApiPath},
    models::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    repository::CategoryRepository,
    response::{ApiResponse, ApiResult},
};

#[utoipa::path(
    post,
    path = "/api/category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Created", body = ApiResponse<Category>),
        (status = 400, description = "Empty name"),
        (status = 500, description = "Name already used")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    Ok(ApiResponse::ok(state.repo.create_category(payload).await?))
}

/// get_category
///
/// [Public Route] A category with summaries of its articles, newest first.
#[utoipa::path(
    get,
    path = "/api/category/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses((status = 200, description = "Found", body = ApiResponse<Category>))
)]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Category> {
    Ok(ApiResponse::ok(state.repo.get_category(id).await?))
}

/// list_categories
///
/// [Public Route] Every category, unpaginated.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<Category>>))
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(ApiResponse::ok(state.repo.list_categories().await?))
}

#[utoipa::path(
    put,
    path = "/api/category/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses((status = 200, description = "Updated", body = ApiResponse<Category>)),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    Ok(ApiResponse::ok(state.repo.update_category(id, payload).await?))
}

/// delete_category
///
/// [Authenticated Route] Deletes the category. Its articles are kept; only the
/// associations are cleared.
#[utoipa::path(
    delete,
    path = "/api/category/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses((status = 200, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    state.repo.delete_category(id).await?;
    tracing::info!(category_id = id, user_id = user.id, "category deleted");
    Ok(ApiResponse::empty())
}
