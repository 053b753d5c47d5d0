use axum::extract::State;

use crate::{
    AppState,
    auth::AuthUser,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::{Comment, CreateCommentRequest, UpdateCommentRequest},
    pagination::PageParams,
    policy::authorize,
    repository::CommentRepository,
    response::{ApiResponse, ApiResult},
};

/// create_comment
///
/// [Public Route] Posts a comment. The author is taken from the payload's
/// `user_id`; both the article and the user must exist.
#[utoipa::path(
    post,
    path = "/api/comment",
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Created", body = ApiResponse<Comment>),
        (status = 400, description = "Empty content"),
        (status = 500, description = "Unknown article or user")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::ok(state.repo.create_comment(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/comment/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses((status = 200, description = "Found", body = ApiResponse<Comment>))
)]
pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Comment> {
    Ok(ApiResponse::ok(state.repo.get_comment(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/comments",
    params(PageParams),
    responses((
        status = 200,
        description = "Newest comments first",
        body = ApiResponse<Vec<Comment>>
    ))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<Comment>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(state.repo.list_comments(page).await?))
}

#[utoipa::path(
    get,
    path = "/api/comments/article/{id}",
    params(("id" = i64, Path, description = "Article ID"), PageParams),
    responses((
        status = 200,
        description = "Comments on the article",
        body = ApiResponse<Vec<Comment>>
    ))
)]
pub async fn list_comments_by_article(
    State(state): State<AppState>,
    ApiPath(article_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<Comment>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(
        state.repo.list_comments_by_article(article_id, page).await?,
    ))
}

/// update_comment
///
/// [Authenticated Route] Edits a comment.
///
/// *Authorization*: the owner is resolved from the store, never from the payload,
/// and must be the caller.
#[utoipa::path(
    put,
    path = "/api/comment/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Comment>),
        (status = 403, description = "Not the author")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateCommentRequest>,
) -> ApiResult<Comment> {
    let owner = state.repo.comment_owner(id).await?;
    authorize(&user, &owner)?;

    Ok(ApiResponse::ok(state.repo.update_comment(id, payload).await?))
}

/// delete_comment
///
/// [Authenticated Route] Deletes a comment. Same ownership rule as `update_comment`.
#[utoipa::path(
    delete,
    path = "/api/comment/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    let owner = state.repo.comment_owner(id).await?;
    authorize(&user, &owner)?;

    state.repo.delete_comment(id).await?;
    Ok(ApiResponse::empty())
}
