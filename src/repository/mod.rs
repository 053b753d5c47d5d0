use async_trait::async_trait;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::{
    error::{StoreError, StoreResult},
    models::{
        Article, ArticleSummary, Category, Comment, CommentOwnership, CreateArticleRequest,
        CreateCategoryRequest, CreateCommentRequest, Credentials, NewUser, UpdateArticleRequest,
        UpdateCategoryRequest, UpdateCommentRequest, User, UserChanges,
    },
    pagination::Page,
};

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// UserRepository
///
/// Persistence contract for users. Uniqueness of username and email is checked here
/// before every insert/update; the schema's UNIQUE constraints back the check up
/// against concurrent writers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>>;
    // Case-insensitive substring match on username.
    async fn search_users(&self, username: &str, page: Page) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    async fn update_password(&self, id: i64, password_digest: String) -> StoreResult<()>;
    /// Deletes the user and every comment they wrote. Deleting an id that does not
    /// exist succeeds.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;
    /// Login flow only: the one read that returns the password digest.
    async fn get_credentials(&self, username: &str) -> StoreResult<Credentials>;
    async fn record_login(&self, id: i64) -> StoreResult<()>;
}

/// CategoryRepository
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, req: CreateCategoryRequest) -> StoreResult<Category>;
    async fn get_category(&self, id: i64) -> StoreResult<Category>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn update_category(&self, id: i64, req: UpdateCategoryRequest) -> StoreResult<Category>;
    /// Clears the category's article associations, then deletes it. Articles survive.
    async fn delete_category(&self, id: i64) -> StoreResult<()>;
}

/// ArticleRepository
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create_article(&self, req: CreateArticleRequest) -> StoreResult<Article>;
    async fn get_article(&self, id: i64) -> StoreResult<Article>;
    async fn list_articles(&self, page: Page) -> StoreResult<Vec<ArticleSummary>>;
    async fn list_articles_by_category(
        &self,
        category_id: i64,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>>;
    // Case-insensitive substring match on title.
    async fn list_articles_by_title(
        &self,
        title: &str,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>>;
    async fn update_article(&self, id: i64, req: UpdateArticleRequest) -> StoreResult<Article>;
    /// Deletes the article's comments and category associations, then the article.
    async fn delete_article(&self, id: i64) -> StoreResult<()>;
}

/// CommentRepository
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, req: CreateCommentRequest) -> StoreResult<Comment>;
    async fn get_comment(&self, id: i64) -> StoreResult<Comment>;
    async fn list_comments(&self, page: Page) -> StoreResult<Vec<Comment>>;
    async fn list_comments_by_article(
        &self,
        article_id: i64,
        page: Page,
    ) -> StoreResult<Vec<Comment>>;
    /// Who owns a comment. Used by the ownership policy only.
    async fn comment_owner(&self, id: i64) -> StoreResult<CommentOwnership>;
    async fn update_comment(&self, id: i64, req: UpdateCommentRequest) -> StoreResult<Comment>;
    async fn delete_comment(&self, id: i64) -> StoreResult<()>;
}

/// Repository
///
/// The whole entity store. Handlers hold it as a trait object so the Postgres and
/// in-memory backends are interchangeable.
pub trait Repository:
    UserRepository + CategoryRepository + ArticleRepository + CommentRepository
{
}

impl<T> Repository for T where
    T: UserRepository + CategoryRepository + ArticleRepository + CommentRepository
{
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// --- Field checks shared by both backends ---

/// Empty or whitespace only. The one definition of "blank" every required field uses.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn check_username(username: &str) -> StoreResult<()> {
    if is_blank(username) {
        return Err(StoreError::UsernameEmpty);
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> StoreResult<()> {
    if is_blank(email) {
        return Err(StoreError::EmailEmpty);
    }
    if !email.validate_email() {
        return Err(StoreError::EmailInvalid);
    }
    Ok(())
}

pub(crate) fn check_password(password_digest: &str) -> StoreResult<()> {
    if is_blank(password_digest) {
        return Err(StoreError::PasswordEmpty);
    }
    Ok(())
}

pub(crate) fn check_category_name(name: &str) -> StoreResult<()> {
    if is_blank(name) {
        return Err(StoreError::NameEmpty);
    }
    Ok(())
}

pub(crate) fn check_title(title: &str) -> StoreResult<()> {
    if is_blank(title) {
        return Err(StoreError::TitleEmpty);
    }
    Ok(())
}

pub(crate) fn check_comment_content(content: &str) -> StoreResult<()> {
    if is_blank(content) {
        return Err(StoreError::ContentEmpty);
    }
    Ok(())
}

/// Runs the creation checks of a user in the order they are reported.
pub(crate) fn check_new_user(user: &NewUser) -> StoreResult<()> {
    check_username(&user.username)?;
    check_email(&user.email)?;
    check_password(&user.password_digest)
}

/// Runs the creation checks on every supplied field of a partial update.
pub(crate) fn check_user_changes(changes: &UserChanges) -> StoreResult<()> {
    if let Some(username) = &changes.username {
        check_username(username)?;
    }
    if let Some(email) = &changes.email {
        check_email(email)?;
    }
    if let Some(digest) = &changes.password_digest {
        check_password(digest)?;
    }
    Ok(())
}
