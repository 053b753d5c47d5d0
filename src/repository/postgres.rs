use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction, query_builder::QueryBuilder};
use std::collections::HashMap;

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

const USER_COLUMNS: &str = "id, username, email, created_at, last_login_at";

// Article projections always select from `articles a`.
const ARTICLE_SUMMARY_COLUMNS: &str = r#"
    a.id, a.title, a.created_at, a.updated_at,
    (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS comment_count,
    a.read_count
"#;

const COMMENT_SELECT: &str = r#"
    SELECT
        cm.id, cm.content, cm.created_at,
        a.id AS article_id, a.title AS article_title,
        a.created_at AS article_created_at, a.updated_at AS article_updated_at,
        (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS article_comment_count,
        a.read_count AS article_read_count,
        u.id AS user_id, u.username, u.email
    FROM comments cm
    JOIN articles a ON a.id = cm.article_id
    JOIN users u ON u.id = cm.user_id
"#;

/// CommentRow
///
/// Flat row produced by `COMMENT_SELECT`, folded into the nested [`Comment`] view.
#[derive(FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    created_at: DateTime<Utc>,
    article_id: i64,
    article_title: String,
    article_created_at: DateTime<Utc>,
    article_updated_at: DateTime<Utc>,
    article_comment_count: i64,
    article_read_count: i64,
    user_id: i64,
    username: String,
    email: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            created_at: row.created_at,
            article: ArticleSummary {
                id: row.article_id,
                title: row.article_title,
                created_at: row.article_created_at,
                updated_at: row.article_updated_at,
                comment_count: row.article_comment_count,
                read_count: row.article_read_count,
            },
            user: UserSummary {
                id: row.user_id,
                username: row.username,
                email: row.email,
            },
        }
    }
}

#[derive(FromRow)]
struct CategoryArticleRow {
    category_id: i64,
    #[sqlx(flatten)]
    article: ArticleSummary,
}

/// like_pattern
///
/// `%term%` with the LIKE wildcards in `term` escaped, so user input only ever
/// matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// map_write_error
///
/// Translates a violation of one of the schema's UNIQUE constraints into the same
/// typed conflict the application-level check reports. This covers the window
/// between a uniqueness check and the following write.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("users_username_key") => return StoreError::UsernameTaken,
                Some("users_email_key") => return StoreError::EmailTaken,
                Some("categories_name_key") => return StoreError::NameTaken,
                _ => {}
            }
        }
    }
    StoreError::Database(e)
}

/// PostgresRepository
///
/// The repository traits backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn username_taken(&self, username: &str, except: Option<i64>) -> StoreResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(username)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> StoreResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn category_name_taken(&self, name: &str, except: Option<i64>) -> StoreResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn row_exists(&self, sql: &'static str, id: i64) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(sql).bind(id).fetch_one(&self.pool).await?;
        Ok(exists)
    }

    async fn article_categories(&self, article_id: i64) -> StoreResult<Vec<CategoryRef>> {
        let categories = sqlx::query_as::<_, CategoryRef>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN article_categories ac ON ac.category_id = c.id
            WHERE ac.article_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn category_articles(&self, category_id: i64) -> StoreResult<Vec<ArticleSummary>> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_SUMMARY_COLUMNS}
            FROM articles a
            JOIN article_categories ac ON ac.article_id = a.id
            WHERE ac.category_id = $1
            ORDER BY a.created_at DESC, a.id DESC
            "#
        );
        let articles = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(articles)
    }

    async fn fetch_comments(
        &self,
        article_id: Option<i64>,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(COMMENT_SELECT);

        if let Some(id) = article_id {
            builder.push(" WHERE cm.article_id = ");
            builder.push_bind(id);
        }

        builder.push(" ORDER BY cm.created_at DESC, cm.id DESC LIMIT ");
        builder.push_bind(page.size());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder.build_query_as::<CommentRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

/// ensure_categories_exist
///
/// `CategoryNotFound` unless every id in `ids` names an existing category.
/// Expects `ids` sorted and deduplicated.
async fn ensure_categories_exist(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[i64],
) -> StoreResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(&mut **tx)
        .await?;

    if found != ids.len() as i64 {
        return Err(StoreError::CategoryNotFound);
    }
    Ok(())
}

async fn link_categories(
    tx: &mut Transaction<'_, Postgres>,
    article_id: i64,
    ids: &[i64],
) -> StoreResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO article_categories (article_id, category_id) SELECT $1, UNNEST($2::BIGINT[])",
    )
    .bind(article_id)
    .bind(ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn normalized_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// --- Users ---

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        check_new_user(&user)?;

        if self.username_taken(&user.username, None).await? {
            return Err(StoreError::UsernameTaken);
        }
        if self.email_taken(&user.email, None).await? {
            return Err(StoreError::EmailTaken);
        }

        let sql = format!(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_digest)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::UserNotFound)
    }

    async fn list_users(&self, page: Page) -> StoreResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn search_users(&self, username: &str, page: Page) -> StoreResult<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(like_pattern(username))
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// update_user
    ///
    /// Uses COALESCE so only the supplied fields are overwritten.
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        if !self.row_exists("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)", id).await? {
            return Err(StoreError::UserNotFound);
        }

        check_user_changes(&changes)?;

        if let Some(username) = &changes.username {
            if self.username_taken(username, Some(id)).await? {
                return Err(StoreError::UsernameTaken);
            }
        }
        if let Some(email) = &changes.email {
            if self.email_taken(email, Some(id)).await? {
                return Err(StoreError::EmailTaken);
            }
        }

        let sql = format!(
            r#"
            UPDATE users SET
                username = COALESCE($1, username),
                email = COALESCE($2, email),
                password = COALESCE($3, password)
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(changes.username)
            .bind(changes.email)
            .bind(changes.password_digest)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(StoreError::UserNotFound)
    }

    async fn update_password(&self, id: i64, password_digest: String) -> StoreResult<()> {
        check_password(&password_digest)?;

        let result = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_digest)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_credentials(&self, username: &str) -> StoreResult<Credentials> {
        sqlx::query_as::<_, Credentials>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UserNotFound)
    }

    async fn record_login(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound);
        }
        Ok(())
    }
}

// --- Categories ---

#[async_trait]
impl CategoryRepository for PostgresRepository {
    async fn create_category(&self, req: CreateCategoryRequest) -> StoreResult<Category> {
        check_category_name(&req.name)?;

        if self.category_name_taken(&req.name, None).await? {
            return Err(StoreError::NameTaken);
        }

        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&req.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn get_category(&self, id: i64) -> StoreResult<Category> {
        let mut category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::CategoryNotFound)?;

        category.articles = self.category_articles(id).await?;
        Ok(category)
    }

    /// list_categories
    ///
    /// Two queries: the categories, then every association with its article summary,
    /// grouped in memory.
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let sql = format!(
            r#"
            SELECT ac.category_id, {ARTICLE_SUMMARY_COLUMNS}
            FROM article_categories ac
            JOIN articles a ON a.id = ac.article_id
            ORDER BY a.created_at DESC, a.id DESC
            "#
        );
        let rows = sqlx::query_as::<_, CategoryArticleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut by_category: HashMap<i64, Vec<ArticleSummary>> = HashMap::new();
        for row in rows {
            by_category.entry(row.category_id).or_default().push(row.article);
        }
        for category in &mut categories {
            category.articles = by_category.remove(&category.id).unwrap_or_default();
        }

        Ok(categories)
    }

    async fn update_category(&self, id: i64, req: UpdateCategoryRequest) -> StoreResult<Category> {
        if !self.row_exists("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)", id).await? {
            return Err(StoreError::CategoryNotFound);
        }

        if let Some(name) = &req.name {
            check_category_name(name)?;
            if self.category_name_taken(name, Some(id)).await? {
                return Err(StoreError::NameTaken);
            }
        }

        sqlx::query("UPDATE categories SET name = COALESCE($1, name) WHERE id = $2")
            .bind(req.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        self.get_category(id).await
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM article_categories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Dropping the transaction rolls back the association clear.
        if result.rows_affected() == 0 {
            return Err(StoreError::CategoryNotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

// --- Articles ---

#[async_trait]
impl ArticleRepository for PostgresRepository {
    async fn create_article(&self, req: CreateArticleRequest) -> StoreResult<Article> {
        check_title(&req.title)?;
        let category_ids = normalized_ids(&req.category_ids);

        let mut tx = self.pool.begin().await?;
        ensure_categories_exist(&mut tx, &category_ids).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO articles (title, content) VALUES ($1, $2) RETURNING id",
        )
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&mut *tx)
        .await?;

        link_categories(&mut tx, id, &category_ids).await?;
        tx.commit().await?;

        self.get_article(id).await
    }

    async fn get_article(&self, id: i64) -> StoreResult<Article> {
        let mut article = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.id, a.title, a.content, a.created_at, a.updated_at,
                (SELECT COUNT(*) FROM comments c WHERE c.article_id = a.id) AS comment_count,
                a.read_count
            FROM articles a
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ArticleNotFound)?;

        article.categories = self.article_categories(id).await?;
        Ok(article)
    }

    async fn list_articles(&self, page: Page) -> StoreResult<Vec<ArticleSummary>> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_SUMMARY_COLUMNS}
            FROM articles a
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let articles = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(articles)
    }

    async fn list_articles_by_category(
        &self,
        category_id: i64,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_SUMMARY_COLUMNS}
            FROM articles a
            JOIN article_categories ac ON ac.article_id = a.id
            WHERE ac.category_id = $1
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let articles = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(category_id)
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(articles)
    }

    async fn list_articles_by_title(
        &self,
        title: &str,
        page: Page,
    ) -> StoreResult<Vec<ArticleSummary>> {
        let sql = format!(
            r#"
            SELECT {ARTICLE_SUMMARY_COLUMNS}
            FROM articles a
            WHERE a.title ILIKE $1
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let articles = sqlx::query_as::<_, ArticleSummary>(&sql)
            .bind(like_pattern(title))
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(articles)
    }

    /// update_article
    ///
    /// Field overwrites, the `updated_at` stamp and an optional category set
    /// replacement are applied in one transaction.
    async fn update_article(&self, id: i64, req: UpdateArticleRequest) -> StoreResult<Article> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i64>("SELECT id FROM articles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::ArticleNotFound)?;

        if let Some(title) = &req.title {
            check_title(title)?;
        }

        sqlx::query(
            r#"
            UPDATE articles SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                read_count = COALESCE($3, read_count),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(req.title)
        .bind(req.content)
        .bind(req.read_count)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(ids) = req.category_ids {
            let category_ids = normalized_ids(&ids);
            ensure_categories_exist(&mut tx, &category_ids).await?;

            sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_categories(&mut tx, id, &category_ids).await?;
        }

        tx.commit().await?;
        self.get_article(id).await
    }

    async fn delete_article(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE article_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ArticleNotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

// --- Comments ---

#[async_trait]
impl CommentRepository for PostgresRepository {
    async fn create_comment(&self, req: CreateCommentRequest) -> StoreResult<Comment> {
        check_comment_content(&req.content)?;

        if !self
            .row_exists("SELECT EXISTS(SELECT 1 FROM articles WHERE id = $1)", req.article_id)
            .await?
        {
            return Err(StoreError::ArticleNotFound);
        }
        if !self
            .row_exists("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)", req.user_id)
            .await?
        {
            return Err(StoreError::UserNotFound);
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (content, article_id, user_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&req.content)
        .bind(req.article_id)
        .bind(req.user_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_comment(id).await
    }

    async fn get_comment(&self, id: i64) -> StoreResult<Comment> {
        let sql = format!("{COMMENT_SELECT} WHERE cm.id = $1");
        sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Comment::from)
            .ok_or(StoreError::CommentNotFound)
    }

    async fn list_comments(&self, page: Page) -> StoreResult<Vec<Comment>> {
        self.fetch_comments(None, page).await
    }

    async fn list_comments_by_article(
        &self,
        article_id: i64,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        self.fetch_comments(Some(article_id), page).await
    }

    async fn comment_owner(&self, id: i64) -> StoreResult<CommentOwnership> {
        sqlx::query_as::<_, CommentOwnership>("SELECT id, user_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::CommentNotFound)
    }

    async fn update_comment(&self, id: i64, req: UpdateCommentRequest) -> StoreResult<Comment> {
        if !self.row_exists("SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)", id).await? {
            return Err(StoreError::CommentNotFound);
        }

        if let Some(content) = &req.content {
            check_comment_content(content)?;
        }

        let result =
            sqlx::query("UPDATE comments SET content = COALESCE($1, content) WHERE id = $2")
                .bind(req.content)
                .bind(id)
                .execute(&self.pool)
                .await?;

        // Deleted between the check and the update.
        if result.rows_affected() == 0 {
            return Err(StoreError::CommentNotFound);
        }
        self.get_comment(id).await
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::CommentNotFound);
        }
        Ok(())
    }
}
