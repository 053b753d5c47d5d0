use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The externally visible projection of a `users` row. The password digest is never
/// part of it; only [`Credentials`] carries the digest, for the login flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string | null")]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// UserSummary
///
/// The author projection nested inside a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Credentials
///
/// Internal only: what the login flow needs to check a password. Not serializable.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_digest: String,
}

/// CategoryRef
///
/// A category as listed on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// ArticleSummary
///
/// List projection of an article: everything except the content.
/// `comment_count` is derived from the comments referencing the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub comment_count: i64,
    pub read_count: i64,
}

/// Article
///
/// Full projection returned by single-article reads, including content and
/// the categories the article belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub comment_count: i64,
    pub read_count: i64,
    // Loaded from article_categories in a second query.
    #[sqlx(skip)]
    pub categories: Vec<CategoryRef>,
}

impl Article {
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            comment_count: self.comment_count,
            read_count: self.read_count,
        }
    }
}

/// Category
///
/// A category with summaries of the articles associated with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[sqlx(skip)]
    pub articles: Vec<ArticleSummary>,
}

/// Comment
///
/// A comment with summary projections of the article it belongs to and its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub article: ArticleSummary,
    pub user: UserSummary,
}

/// CommentOwnership
///
/// The lightweight projection the ownership policy resolves a comment to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct CommentOwnership {
    #[sqlx(rename = "id")]
    pub comment_id: i64,
    pub user_id: i64,
}

// --- Store Inputs ---

/// NewUser
///
/// A user ready for insertion: the password has already been hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

/// UserChanges
///
/// Partial user update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_digest: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateUserRequest
///
/// Registration payload (POST /api/user). Emptiness and email shape are checked by the
/// store so they surface as their own codes; only upper bounds are checked here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    #[validate(length(max = 20))]
    pub username: String,
    #[validate(length(max = 100))]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
}

/// UpdateUserRequest
///
/// Partial profile update (PUT /api/user/{id}). Omitted fields are left unchanged;
/// a supplied field is validated exactly as on creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdatePasswordRequest {
    #[validate(length(max = 100))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// CreateArticleRequest
///
/// POST /api/article. `category_ids` must all reference existing categories.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateArticleRequest {
    #[validate(length(max = 100))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// UpdateArticleRequest
///
/// Partial update payload for PUT /api/article/{id}.
///
/// Every field is an `Option`: `None` means "not supplied", while `Some` always
/// overwrites, so content can be cleared with `""` and the read count reset with `0`.
/// `category_ids`, when supplied, replaces the article's whole category set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateArticleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub read_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateCategoryRequest {
    #[validate(length(max = 50))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub name: Option<String>,
}

/// CreateCommentRequest
///
/// POST /api/comment. Both references must point at existing rows.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[validate(length(max = 500))]
    pub content: String,
    pub article_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateCommentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub content: Option<String>,
}

/// UploadResponse
///
/// Where an uploaded file ended up.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
}
