use axum::extract::State;

use crate::{
    AppState,
    auth::AuthUser,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::{Article, ArticleSummary, CreateArticleRequest, UpdateArticleRequest},
    pagination::PageParams,
    repository::ArticleRepository,
    response::{ApiResponse, ApiResult},
};

/// create_article
///
/// [Authenticated Route] Publishes an article, optionally filed under existing categories.
#[utoipa::path(
    post,
    path = "/api/article",
    request_body = CreateArticleRequest,
    responses(
        (status = 200, description = "Created", body = ApiResponse<Article>),
        (status = 400, description = "Empty title"),
        (status = 500, description = "Unknown category")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_article(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateArticleRequest>,
) -> ApiResult<Article> {
    let article = state.repo.create_article(payload).await?;
    tracing::info!(article_id = article.id, user_id = user.id, "article created");
    Ok(ApiResponse::ok(article))
}

/// get_article
///
/// [Public Route] Full article, content and categories included.
#[utoipa::path(
    get,
    path = "/api/article/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses((status = 200, description = "Found", body = ApiResponse<Article>))
)]
pub async fn get_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Article> {
    Ok(ApiResponse::ok(state.repo.get_article(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/articles",
    params(PageParams),
    responses((
        status = 200,
        description = "Newest articles first",
        body = ApiResponse<Vec<ArticleSummary>>
    ))
)]
pub async fn list_articles(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<ArticleSummary>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(state.repo.list_articles(page).await?))
}

#[utoipa::path(
    get,
    path = "/api/articles/category/{id}",
    params(("id" = i64, Path, description = "Category ID"), PageParams),
    responses((
        status = 200,
        description = "Articles in the category",
        body = ApiResponse<Vec<ArticleSummary>>
    ))
)]
pub async fn list_articles_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<ArticleSummary>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(
        state.repo.list_articles_by_category(category_id, page).await?,
    ))
}

/// list_articles_by_title
///
/// [Public Route] Case-insensitive substring search on the title.
#[utoipa::path(
    get,
    path = "/api/articles/{title}",
    params(("title" = String, Path, description = "Title fragment"), PageParams),
    responses((
        status = 200,
        description = "Matching articles",
        body = ApiResponse<Vec<ArticleSummary>>
    ))
)]
pub async fn list_articles_by_title(
    State(state): State<AppState>,
    ApiPath(title): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<ArticleSummary>> {
    let page = params.page()?;
    Ok(ApiResponse::ok(state.repo.list_articles_by_title(&title, page).await?))
}

/// update_article
///
/// [Authenticated Route] Partial update: only supplied fields change. Supplying
/// `category_ids` replaces the whole category set.
#[utoipa::path(
    put,
    path = "/api/article/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Article>),
        (status = 500, description = "Unknown article or category")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_article(
    _user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateArticleRequest>,
) -> ApiResult<Article> {
    Ok(ApiResponse::ok(state.repo.update_article(id, payload).await?))
}

/// delete_article
///
/// [Authenticated Route] Removes the article together with its comments and
/// category associations.
#[utoipa::path(
    delete,
    path = "/api/article/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses((status = 200, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_article(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    state.repo.delete_article(id).await?;
    tracing::info!(article_id = id, user_id = user.id, "article deleted");
    Ok(ApiResponse::empty())
}
