use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::{
    ArticleRepository, CategoryRepository, CommentRepository, UserRepository, check_category_name,
    check_comment_content, check_new_user, check_password, check_title, check_user_changes,
};
use crate::{
    error::{StoreError, StoreResult},
    models::{
        Article, ArticleSummary, Category, CategoryRef, Comment, CommentOwnership,
        CreateArticleRequest, CreateCategoryRequest, CreateCommentRequest, Credentials, NewUser,
        UpdateArticleRequest, UpdateCategoryRequest, UpdateCommentRequest, User, UserChanges,
        UserSummary,
    },
    pagination::Page,
};

struct StoredUser {
    user: User,
    password_digest: String,
}

struct StoredArticle {
    id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    read_count: i64,
}

struct StoredComment {
    id: i64,
    content: String,
    created_at: DateTime<Utc>,
    article_id: i64,
    user_id: i64,
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, StoredUser>,
    articles: BTreeMap<i64, StoredArticle>,
    categories: BTreeMap<i64, String>,
    // (article_id, category_id)
    links: BTreeSet<(i64, i64)>,
    comments: BTreeMap<i64, StoredComment>,
    last_id: i64,
}

impl MemoryState {
    // One sequence shared by every table; ids only need to be unique per table.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.user.username == username && Some(u.user.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.user.email == email && Some(u.user.id) != except)
    }

    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .iter()
            .any(|(id, existing)| existing == name && Some(*id) != except)
    }

    fn ensure_categories_exist(&self, ids: &[i64]) -> StoreResult<()> {
        if ids.iter().all(|id| self.categories.contains_key(id)) {
            Ok(())
        } else {
            Err(StoreError::CategoryNotFound)
        }
    }

    fn comment_count(&self, article_id: i64) -> i64 {
        self.comments.values().filter(|c| c.article_id == article_id).count() as i64
    }

    fn article_summary(&self, article: &StoredArticle) -> ArticleSummary {
        ArticleSummary {
            id: article.id,
            title: article.title.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            comment_count: self.comment_count(article.id),
            read_count: article.read_count,
        }
    }

    fn article_view(&self, id: i64) -> StoreResult<Article> {
        let article = self.articles.get(&id).ok_or(StoreError::ArticleNotFound)?;

        let categories = self
            .links
            .range((id, i64::MIN)..=(id, i64::MAX))
            .filter_map(|(_, category_id)| {
                self.categories.get(category_id).map(|name| CategoryRef {
                    id: *category_id,
                    name: name.clone(),
                })
            })
            .collect();

        Ok(Article {
            id: article.id,
            title: article.title.clone(),
            content: article.content.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            comment_count: self.comment_count(article.id),
            read_count: article.read_count,
            categories,
        })
    }

    /// Summaries of the given articles, newest first.
    fn newest_articles<'a>(
        &self,
        articles: impl Iterator<Item = &'a StoredArticle>,
    ) -> Vec<ArticleSummary> {
        let mut summaries: Vec<ArticleSummary> =
            articles.map(|a| self.article_summary(a)).collect();
        summaries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        summaries
    }

    /// Summaries of the articles linked to category `id`, newest first. Empty for an
    /// unknown category.
    fn category_articles(&self, id: i64) -> Vec<ArticleSummary> {
        self.newest_articles(
            self.links
                .iter()
                .filter(|(_, category_id)| *category_id == id)
                .filter_map(|(article_id, _)| self.articles.get(article_id)),
        )
    }

    fn category_view(&self, id: i64) -> StoreResult<Category> {
        let name = self.categories.get(&id).ok_or(StoreError::CategoryNotFound)?;

        Ok(Category {
            id,
            name: name.clone(),
            articles: self.category_articles(id),
        })
    }

    fn comment_view(&self, comment: &StoredComment) -> StoreResult<Comment> {
        // Cascades keep both references alive for as long as the comment exists.
        let article = self
            .articles
            .get(&comment.article_id)
            .ok_or(StoreError::ArticleNotFound)?;
        let author = self.users.get(&comment.user_id).ok_or(StoreError::UserNotFound)?;

        Ok(Comment {
            id: comment.id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            article: self.article_summary(article),
            user: UserSummary {
                id: author.user.id,
                username: author.user.username.clone(),
                email: author.user.email.clone(),
            },
        })
    }

    fn newest_comments<'a>(
        &self,
        comments: impl Iterator<Item = &'a StoredComment>,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        let mut selected: Vec<&StoredComment> = comments.collect();
        selected.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        page.apply(selected)
            .into_iter()
            .map(|c| self.comment_view(c))
            .collect()
    }

    fn newest_users<'a>(
        &self,
        users: impl Iterator<Item = &'a StoredUser>,
        page: Page,
    ) -> Vec<User> {
        let mut selected: Vec<&User> = users.map(|u| &u.user).collect();
        selected.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        page.apply(selected).into_iter().cloned().collect()
    }

    fn replace_links(&mut self, article_id: i64, category_ids: &[i64]) {
        self.links.retain(|(a, _)| *a != article_id);
        self.links.extend(category_ids.iter().map(|c| (article_id, *c)));
    }
}

/// MemoryRepository
///
/// The repository traits over in-process maps. Every operation takes the lock once,
/// so each mutation is atomic with respect to other requests. State is lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// --- Users ---

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        check_new_user(&user)?;

        let mut state = self.state.write().await;
        if state.username_taken(&user.username, None) {
            return Err(StoreError::UsernameTaken);
        }
        if state.email_taken(&user.email, None) {
            return Err(StoreError::EmailTaken);
        }

        let created = User {
            id: state.next_id(),
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
            last_login_at: None,
        };
        state.users.insert(
            created.id,
            StoredUser {
                user: created.clone(),
                password_digest: user.password_digest,
            },
        );

        Ok(created)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let state = self.state.read().await;
        state
            .users
            .get(&id)
            .map(|u| u.user.clone())
            .ok_or(StoreError::UserNotFound)
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.newest_users(state.users.values(), page))
    }

    async fn search_users(&self, username: &str, page: Page) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let matching = state
            .users
            .values()
            .filter(|u| contains_ignore_case(&u.user.username, username));
        Ok(state.newest_users(matching, page))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::UserNotFound);
        }

        check_user_changes(&changes)?;

        if let Some(username) = &changes.username {
            if state.username_taken(username, Some(id)) {
                return Err(StoreError::UsernameTaken);
            }
        }
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::EmailTaken);
            }
        }

        let stored = state.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        if let Some(username) = changes.username {
            stored.user.username = username;
        }
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(digest) = changes.password_digest {
            stored.password_digest = digest;
        }

        Ok(stored.user.clone())
    }

    async fn update_password(&self, id: i64, password_digest: String) -> StoreResult<()> {
        check_password(&password_digest)?;

        let mut state = self.state.write().await;
        let stored = state.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        stored.password_digest = password_digest;
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.comments.retain(|_, c| c.user_id != id);
        state.users.remove(&id);
        Ok(())
    }

    async fn get_credentials(&self, username: &str) -> StoreResult<Credentials> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.user.username == username)
            .map(|u| Credentials {
                id: u.user.id,
                username: u.user.username.clone(),
                password_digest: u.password_digest.clone(),
            })
            .ok_or(StoreError::UserNotFound)
    }

    async fn record_login(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let stored = state.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        stored.user.last_login_at = Some(Utc::now());
        Ok(())
    }
}

// --- Categories ---

#[async_trait]
impl CategoryRepository for MemoryRepository {
    async fn create_category(&self, req: CreateCategoryRequest) -> StoreResult<Category> {
        check_category_name(&req.name)?;

        let mut state = self.state.write().await;
        if state.category_name_taken(&req.name, None) {
            return Err(StoreError::NameTaken);
        }

        let id = state.next_id();
        state.categories.insert(id, req.name.clone());

        Ok(Category {
            id,
            name: req.name,
            articles: Vec::new(),
        })
    }

    async fn get_category(&self, id: i64) -> StoreResult<Category> {
        let state = self.state.read().await;
        state.category_view(id)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.read().await;
        state
            .categories
            .keys()
            .map(|id| state.category_view(*id))
            .collect()
    }

    async fn update_category(&self, id: i64, req: UpdateCategoryRequest) -> StoreResult<Category> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&id) {
            return Err(StoreError::CategoryNotFound);
        }

        if let Some(name) = req.name {
            check_category_name(&name)?;
            if state.category_name_taken(&name, Some(id)) {
                return Err(StoreError::NameTaken);
            }
            state.categories.insert(id, name);
        }

        state.category_view(id)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.categories.remove(&id).is_none() {
            return Err(StoreError::CategoryNotFound);
        }
        state.links.retain(|(_, category_id)| *category_id != id);
        Ok(())
    }
}

// --- Articles ---

#[async_trait]
impl ArticleRepository for MemoryRepository {
    async fn create_article(&self, req: CreateArticleRequest) -> StoreResult<Article> {
        check_title(&req.title)?;

        let mut state = self.state.write().await;
        state.ensure_categories_exist(&req.category_ids)?;

        let id = state.next_id();
        let now = Utc::now();
        state.articles.insert(
            id,
            StoredArticle {
                id,
                title: req.title,
                content: req.content,
                created_at: now,
                updated_at: now,
                read_count: 0,
            },
        );
        state.replace_links(id, &req.category_ids);

        state.article_view(id)
    }

    async fn get_article(&self, id: i64) -> StoreResult<Article> {
        let state = self.state.read().await;
        state.article_view(id)
    }

    async fn list_articles(&self, page: Page) -> StoreResult<Vec<ArticleSummary>> {
        let state = self.state.read().await;
        Ok(page.apply(state.newest_articles(state.articles.values())))
    }

    async fn list_articles_by_category(
        &self,
        category_id: i64,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>> {
        let state = self.state.read().await;
        Ok(page.apply(state.category_articles(category_id)))
    }

    async fn list_articles_by_title(
        &self,
        title: &str,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>> {
        let state = self.state.read().await;
        let matching = state
            .articles
            .values()
            .filter(|a| contains_ignore_case(&a.title, title));
        Ok(page.apply(state.newest_articles(matching)))
    }

    async fn update_article(&self, id: i64, req: UpdateArticleRequest) -> StoreResult<Article> {
        let mut state = self.state.write().await;
        if !state.articles.contains_key(&id) {
            return Err(StoreError::ArticleNotFound);
        }
        if let Some(title) = &req.title {
            check_title(title)?;
        }
        if let Some(ids) = &req.category_ids {
            state.ensure_categories_exist(ids)?;
        }

        let article = state.articles.get_mut(&id).ok_or(StoreError::ArticleNotFound)?;
        if let Some(title) = req.title {
            article.title = title;
        }
        if let Some(content) = req.content {
            article.content = content;
        }
        if let Some(read_count) = req.read_count {
            article.read_count = read_count;
        }
        article.updated_at = Utc::now();

        if let Some(ids) = req.category_ids {
            state.replace_links(id, &ids);
        }

        state.article_view(id)
    }

    async fn delete_article(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.articles.remove(&id).is_none() {
            return Err(StoreError::ArticleNotFound);
        }
        state.comments.retain(|_, c| c.article_id != id);
        state.links.retain(|(article_id, _)| *article_id != id);
        Ok(())
    }
}

// --- Comments ---

#[async_trait]
impl CommentRepository for MemoryRepository {
    async fn create_comment(&self, req: CreateCommentRequest) -> StoreResult<Comment> {
        check_comment_content(&req.content)?;

        let mut state = self.state.write().await;
        if !state.articles.contains_key(&req.article_id) {
            return Err(StoreError::ArticleNotFound);
        }
        if !state.users.contains_key(&req.user_id) {
            return Err(StoreError::UserNotFound);
        }

        let id = state.next_id();
        state.comments.insert(
            id,
            StoredComment {
                id,
                content: req.content,
                created_at: Utc::now(),
                article_id: req.article_id,
                user_id: req.user_id,
            },
        );

        let comment = state.comments.get(&id).ok_or(StoreError::CommentNotFound)?;
        state.comment_view(comment)
    }

    async fn get_comment(&self, id: i64) -> StoreResult<Comment> {
        let state = self.state.read().await;
        let comment = state.comments.get(&id).ok_or(StoreError::CommentNotFound)?;
        state.comment_view(comment)
    }

    async fn list_comments(&self, page: Page) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        state.newest_comments(state.comments.values(), page)
    }

    async fn list_comments_by_article(
        &self,
        article_id: i64,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        let state = self.state.read().await;
        let matching = state.comments.values().filter(|c| c.article_id == article_id);
        state.newest_comments(matching, page)
    }

    async fn comment_owner(&self, id: i64) -> StoreResult<CommentOwnership> {
        let state = self.state.read().await;
        state
            .comments
            .get(&id)
            .map(|c| CommentOwnership {
                comment_id: c.id,
                user_id: c.user_id,
            })
            .ok_or(StoreError::CommentNotFound)
    }

    async fn update_comment(&self, id: i64, req: UpdateCommentRequest) -> StoreResult<Comment> {
        let mut state = self.state.write().await;
        let comment = state.comments.get_mut(&id).ok_or(StoreError::CommentNotFound)?;
        if let Some(content) = req.content {
            check_comment_content(&content)?;
            comment.content = content;
        }

        let comment = state.comments.get(&id).ok_or(StoreError::CommentNotFound)?;
        state.comment_view(comment)
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::CommentNotFound)
    }
}
