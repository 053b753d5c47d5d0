//! Shared test scaffolding and the store contract, written once against
//! `&dyn Repository` and run against every backend.
#![allow(dead_code)]

use blog_api::{
    AppConfig, AppState, MemoryRepository, MockStorageService,
    auth::AuthUser,
    error::StoreError,
    models::{
        CreateArticleRequest, CreateCategoryRequest, CreateCommentRequest, NewUser,
        UpdateArticleRequest, UpdateCategoryRequest, UpdateCommentRequest, User, UserChanges,
    },
    pagination::Page,
    repository::{
        ArticleRepository, CategoryRepository, CommentRepository, Repository, RepositoryState,
        UserRepository,
    },
    storage::StorageState,
};
use std::sync::Arc;
use uuid::Uuid;

// --- Scaffolding ---

/// Memory store, recording mock storage, default (local) config.
pub fn test_state() -> AppState {
    state_with_storage(MockStorageService::new())
}

pub fn state_with_storage(storage: MockStorageService) -> AppState {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    let storage = Arc::new(storage) as StorageState;
    AppState::new(repo, storage, AppConfig::default())
}

/// A short random suffix so contract runs never collide on a persistent database.
pub fn unique(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &id[..8])
}

pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_digest: "digest".to_string(),
    }
}

pub async fn seed_user(repo: &dyn Repository, prefix: &str) -> User {
    repo.create_user(new_user(&unique(prefix))).await.unwrap()
}

pub fn as_auth(user: &User) -> AuthUser {
    AuthUser {
        id: user.id,
        username: user.username.clone(),
    }
}

pub fn article(title: &str) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_string(),
        content: format!("content of {}", title),
        category_ids: vec![],
    }
}

pub fn comment(content: &str, article_id: i64, user_id: i64) -> CreateCommentRequest {
    CreateCommentRequest {
        content: content.to_string(),
        article_id,
        user_id,
    }
}

fn page(size: i64, num: i64) -> Page {
    Page::new(size, num).unwrap()
}

// --- Users ---

pub async fn contract_username_and_email_are_unique(repo: &dyn Repository) {
    let name = unique("dup");
    let first = repo.create_user(new_user(&name)).await.unwrap();
    assert!(first.id > 0);
    assert!(first.last_login_at.is_none());

    let same_name = NewUser {
        email: format!("other-{}@example.com", name),
        ..new_user(&name)
    };
    assert!(matches!(
        repo.create_user(same_name).await,
        Err(StoreError::UsernameTaken)
    ));

    let same_email = NewUser {
        username: unique("other"),
        ..new_user(&name)
    };
    assert!(matches!(repo.create_user(same_email).await, Err(StoreError::EmailTaken)));
}

pub async fn contract_user_field_checks(repo: &dyn Repository) {
    let name = unique("chk");

    let cases = [
        (NewUser { username: String::new(), ..new_user(&name) }, "username"),
        (NewUser { email: String::new(), ..new_user(&name) }, "email"),
        (NewUser { email: "not-an-email".into(), ..new_user(&name) }, "shape"),
        (NewUser { password_digest: String::new(), ..new_user(&name) }, "password"),
        // Whitespace-only counts as blank for every field.
        (NewUser { username: "   ".into(), ..new_user(&name) }, "username"),
        (NewUser { email: " \t".into(), ..new_user(&name) }, "email"),
        (NewUser { password_digest: "  ".into(), ..new_user(&name) }, "password"),
    ];

    for (user, case) in cases {
        let err = repo.create_user(user).await.unwrap_err();
        let expected = match case {
            "username" => matches!(err, StoreError::UsernameEmpty),
            "email" => matches!(err, StoreError::EmailEmpty),
            "shape" => matches!(err, StoreError::EmailInvalid),
            _ => matches!(err, StoreError::PasswordEmpty),
        };
        assert!(expected, "case {case}: unexpected {err:?}");
    }
}

pub async fn contract_user_update_excludes_own_id(repo: &dyn Repository) {
    let alice = seed_user(repo, "alice").await;
    let bob = seed_user(repo, "bob").await;

    // Re-submitting your own username is not a conflict.
    let same = repo
        .update_user(
            alice.id,
            UserChanges {
                username: Some(alice.username.clone()),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.username, alice.username);

    let taken = repo
        .update_user(
            alice.id,
            UserChanges {
                username: Some(bob.username.clone()),
                ..UserChanges::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(StoreError::UsernameTaken)));

    // Only the supplied field changes.
    let renamed = unique("alice2");
    let updated = repo
        .update_user(
            alice.id,
            UserChanges {
                username: Some(renamed.clone()),
                ..UserChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, renamed);
    assert_eq!(updated.email, alice.email);

    let blank = repo
        .update_user(
            alice.id,
            UserChanges {
                email: Some(String::new()),
                ..UserChanges::default()
            },
        )
        .await;
    assert!(matches!(blank, Err(StoreError::EmailEmpty)));

    assert!(matches!(
        repo.update_user(-1, UserChanges::default()).await,
        Err(StoreError::UserNotFound)
    ));
}

pub async fn contract_password_update(repo: &dyn Repository) {
    let user = seed_user(repo, "pw").await;

    repo.update_password(user.id, "new-digest".into()).await.unwrap();
    let credentials = repo.get_credentials(&user.username).await.unwrap();
    assert_eq!(credentials.id, user.id);
    assert_eq!(credentials.password_digest, "new-digest");

    assert!(matches!(
        repo.update_password(user.id, String::new()).await,
        Err(StoreError::PasswordEmpty)
    ));
    assert!(matches!(
        repo.update_password(-1, "x".into()).await,
        Err(StoreError::UserNotFound)
    ));
}

pub async fn contract_user_delete_cascades_and_is_idempotent(repo: &dyn Repository) {
    let author = seed_user(repo, "gone").await;
    let other = seed_user(repo, "stay").await;
    let post = repo.create_article(article(&unique("post"))).await.unwrap();

    let doomed = repo.create_comment(comment("bye", post.id, author.id)).await.unwrap();
    let kept = repo.create_comment(comment("hi", post.id, other.id)).await.unwrap();

    repo.delete_user(author.id).await.unwrap();

    assert!(matches!(repo.get_user(author.id).await, Err(StoreError::UserNotFound)));
    assert!(matches!(
        repo.get_comment(doomed.id).await,
        Err(StoreError::CommentNotFound)
    ));
    assert!(repo.get_comment(kept.id).await.is_ok());

    // Deleting again still reports success.
    repo.delete_user(author.id).await.unwrap();
}

pub async fn contract_credentials_and_login_stamp(repo: &dyn Repository) {
    let user = seed_user(repo, "login").await;

    let credentials = repo.get_credentials(&user.username).await.unwrap();
    assert_eq!(credentials.username, user.username);
    assert_eq!(credentials.password_digest, "digest");

    repo.record_login(user.id).await.unwrap();
    assert!(repo.get_user(user.id).await.unwrap().last_login_at.is_some());

    assert!(matches!(
        repo.get_credentials(&unique("nobody")).await,
        Err(StoreError::UserNotFound)
    ));
}

pub async fn contract_user_search_paginates(repo: &dyn Repository) {
    let prefix = unique("pg");
    for i in 0..10 {
        repo.create_user(new_user(&format!("{}u{}", prefix, i))).await.unwrap();
    }

    let last = repo.search_users(&prefix, page(3, 4)).await.unwrap();
    assert_eq!(last.len(), 1);

    let second = repo.search_users(&prefix, page(3, 2)).await.unwrap();
    assert_eq!(second.len(), 3);

    let beyond = repo.search_users(&prefix, page(3, 5)).await.unwrap();
    assert!(beyond.is_empty());

    // Newest first, and the match ignores case.
    let all = repo.search_users(&prefix.to_uppercase(), page(100, 1)).await.unwrap();
    assert_eq!(all.len(), 10);
    assert_eq!(all[0].username, format!("{}u9", prefix));
    assert_eq!(all[9].username, format!("{}u0", prefix));
}

// --- Categories ---

pub async fn contract_category_rules(repo: &dyn Repository) {
    let name = unique("rust");
    let created = repo
        .create_category(CreateCategoryRequest { name: name.clone() })
        .await
        .unwrap();
    assert!(created.articles.is_empty());

    assert!(matches!(
        repo.create_category(CreateCategoryRequest { name: name.clone() }).await,
        Err(StoreError::NameTaken)
    ));
    assert!(matches!(
        repo.create_category(CreateCategoryRequest { name: "  ".into() }).await,
        Err(StoreError::NameEmpty)
    ));

    // Keeping its own name is fine; taking another category's is not.
    let other = repo
        .create_category(CreateCategoryRequest { name: unique("go") })
        .await
        .unwrap();
    repo.update_category(created.id, UpdateCategoryRequest { name: Some(name.clone()) })
        .await
        .unwrap();
    assert!(matches!(
        repo.update_category(created.id, UpdateCategoryRequest { name: Some(other.name.clone()) })
            .await,
        Err(StoreError::NameTaken)
    ));
    assert!(matches!(
        repo.update_category(-1, UpdateCategoryRequest { name: Some(unique("x")) }).await,
        Err(StoreError::CategoryNotFound)
    ));

    assert!(matches!(repo.get_category(-1).await, Err(StoreError::CategoryNotFound)));
    assert!(matches!(repo.delete_category(-1).await, Err(StoreError::CategoryNotFound)));

    let listed = repo.list_categories().await.unwrap();
    assert!(listed.iter().any(|c| c.id == created.id && c.name == name));
}

pub async fn contract_category_delete_keeps_articles(repo: &dyn Repository) {
    let doomed = repo
        .create_category(CreateCategoryRequest { name: unique("doomed") })
        .await
        .unwrap();
    let kept = repo
        .create_category(CreateCategoryRequest { name: unique("kept") })
        .await
        .unwrap();

    let post = repo
        .create_article(CreateArticleRequest {
            category_ids: vec![doomed.id, kept.id],
            ..article(&unique("tagged"))
        })
        .await
        .unwrap();
    assert_eq!(post.categories.len(), 2);

    let with_articles = repo.get_category(doomed.id).await.unwrap();
    assert_eq!(with_articles.articles.len(), 1);
    assert_eq!(with_articles.articles[0].id, post.id);

    repo.delete_category(doomed.id).await.unwrap();

    let after = repo.get_article(post.id).await.unwrap();
    let ids: Vec<i64> = after.categories.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![kept.id]);
    assert!(matches!(
        repo.get_category(doomed.id).await,
        Err(StoreError::CategoryNotFound)
    ));
}

// --- Articles ---

pub async fn contract_article_round_trip_and_partial_update(repo: &dyn Repository) {
    let title = unique("title");
    let created = repo.create_article(article(&title)).await.unwrap();
    assert_eq!(created.comment_count, 0);
    assert_eq!(created.read_count, 0);

    let fetched = repo.get_article(created.id).await.unwrap();
    assert_eq!(fetched.title, title);
    assert_eq!(fetched.content, format!("content of {}", title));

    let updated = repo
        .update_article(
            created.id,
            UpdateArticleRequest {
                read_count: Some(7),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.read_count, 7);
    assert_eq!(updated.title, title);
    assert_eq!(updated.content, fetched.content);

    // Clearing content and zeroing the counter are explicit overwrites.
    let cleared = repo
        .update_article(
            created.id,
            UpdateArticleRequest {
                content: Some(String::new()),
                read_count: Some(0),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.content, "");
    assert_eq!(cleared.read_count, 0);
    assert_eq!(repo.get_article(created.id).await.unwrap().title, title);

    assert!(matches!(
        repo.update_article(
            created.id,
            UpdateArticleRequest {
                title: Some(" ".into()),
                ..UpdateArticleRequest::default()
            }
        )
        .await,
        Err(StoreError::TitleEmpty)
    ));
    assert!(matches!(
        repo.update_article(-1, UpdateArticleRequest::default()).await,
        Err(StoreError::ArticleNotFound)
    ));
    // Existence is checked before the supplied fields.
    assert!(matches!(
        repo.update_article(
            -1,
            UpdateArticleRequest {
                title: Some(String::new()),
                ..UpdateArticleRequest::default()
            }
        )
        .await,
        Err(StoreError::ArticleNotFound)
    ));
    assert!(matches!(repo.get_article(-1).await, Err(StoreError::ArticleNotFound)));
    assert!(matches!(
        repo.create_article(article("")).await,
        Err(StoreError::TitleEmpty)
    ));
}

pub async fn contract_article_categories(repo: &dyn Repository) {
    let first = repo
        .create_category(CreateCategoryRequest { name: unique("c1") })
        .await
        .unwrap();
    let second = repo
        .create_category(CreateCategoryRequest { name: unique("c2") })
        .await
        .unwrap();

    let unknown = repo
        .create_article(CreateArticleRequest {
            category_ids: vec![first.id, -1],
            ..article(&unique("orphan"))
        })
        .await;
    assert!(matches!(unknown, Err(StoreError::CategoryNotFound)));

    let post = repo
        .create_article(CreateArticleRequest {
            category_ids: vec![first.id],
            ..article(&unique("filed"))
        })
        .await
        .unwrap();

    let listed = repo.list_articles_by_category(first.id, page(10, 1)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, post.id);

    let moved = repo
        .update_article(
            post.id,
            UpdateArticleRequest {
                category_ids: Some(vec![second.id]),
                ..UpdateArticleRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.categories.len(), 1);
    assert_eq!(moved.categories[0].id, second.id);
    assert!(repo
        .list_articles_by_category(first.id, page(10, 1))
        .await
        .unwrap()
        .is_empty());

    // An unknown category filters down to nothing rather than failing.
    assert!(repo.list_articles_by_category(-1, page(10, 1)).await.unwrap().is_empty());
}

pub async fn contract_article_title_search_paginates(repo: &dyn Repository) {
    let marker = unique("needle");
    for i in 0..10 {
        repo.create_article(article(&format!("{} part {}", marker, i))).await.unwrap();
    }
    repo.create_article(article(&unique("unrelated"))).await.unwrap();

    assert_eq!(repo.list_articles_by_title(&marker, page(3, 4)).await.unwrap().len(), 1);
    assert_eq!(repo.list_articles_by_title(&marker, page(3, 2)).await.unwrap().len(), 3);

    let all = repo
        .list_articles_by_title(&marker.to_uppercase(), page(100, 1))
        .await
        .unwrap();
    assert_eq!(all.len(), 10);
    assert_eq!(all[0].title, format!("{} part 9", marker));

    // Wildcards in the search term only match literally.
    let literal = repo
        .list_articles_by_title(&format!("{}%part", marker), page(10, 1))
        .await
        .unwrap();
    assert!(literal.is_empty());
}

pub async fn contract_article_delete_cascades(repo: &dyn Repository) {
    let user = seed_user(repo, "reader").await;
    let tag = repo
        .create_category(CreateCategoryRequest { name: unique("tag") })
        .await
        .unwrap();
    let post = repo
        .create_article(CreateArticleRequest {
            category_ids: vec![tag.id],
            ..article(&unique("doomed"))
        })
        .await
        .unwrap();
    let note = repo.create_comment(comment("nice", post.id, user.id)).await.unwrap();

    repo.delete_article(post.id).await.unwrap();

    assert!(matches!(repo.get_comment(note.id).await, Err(StoreError::CommentNotFound)));
    assert!(matches!(repo.get_article(post.id).await, Err(StoreError::ArticleNotFound)));
    assert!(repo.get_category(tag.id).await.unwrap().articles.is_empty());
    assert!(matches!(
        repo.delete_article(post.id).await,
        Err(StoreError::ArticleNotFound)
    ));
}

// --- Comments ---

pub async fn contract_comment_lifecycle(repo: &dyn Repository) {
    let author = seed_user(repo, "writer").await;
    let post = repo.create_article(article(&unique("topic"))).await.unwrap();

    let created = repo.create_comment(comment("first!", post.id, author.id)).await.unwrap();
    assert_eq!(created.article.id, post.id);
    assert_eq!(created.user.id, author.id);
    assert_eq!(created.user.username, author.username);

    // Comment count is derived from the comments themselves.
    assert_eq!(repo.get_article(post.id).await.unwrap().comment_count, 1);

    let owner = repo.comment_owner(created.id).await.unwrap();
    assert_eq!(owner.comment_id, created.id);
    assert_eq!(owner.user_id, author.id);

    let edited = repo
        .update_comment(
            created.id,
            UpdateCommentRequest {
                content: Some("edited".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.content, "edited");

    assert!(matches!(
        repo.update_comment(created.id, UpdateCommentRequest { content: Some("".into()) })
            .await,
        Err(StoreError::ContentEmpty)
    ));
    assert!(matches!(
        repo.create_comment(comment("x", -1, author.id)).await,
        Err(StoreError::ArticleNotFound)
    ));
    assert!(matches!(
        repo.create_comment(comment("x", post.id, -1)).await,
        Err(StoreError::UserNotFound)
    ));
    assert!(matches!(
        repo.create_comment(comment("", post.id, author.id)).await,
        Err(StoreError::ContentEmpty)
    ));

    repo.delete_comment(created.id).await.unwrap();
    assert!(matches!(
        repo.comment_owner(created.id).await,
        Err(StoreError::CommentNotFound)
    ));
    assert!(matches!(
        repo.delete_comment(created.id).await,
        Err(StoreError::CommentNotFound)
    ));
    assert!(matches!(
        repo.update_comment(created.id, UpdateCommentRequest::default()).await,
        Err(StoreError::CommentNotFound)
    ));
    assert!(matches!(
        repo.update_comment(created.id, UpdateCommentRequest { content: Some(String::new()) })
            .await,
        Err(StoreError::CommentNotFound)
    ));
}

pub async fn contract_comments_by_article_paginate(repo: &dyn Repository) {
    let author = seed_user(repo, "chatty").await;
    let post = repo.create_article(article(&unique("busy"))).await.unwrap();
    let quiet = repo.create_article(article(&unique("quiet"))).await.unwrap();

    for i in 0..10 {
        repo.create_comment(comment(&format!("c{}", i), post.id, author.id))
            .await
            .unwrap();
    }
    repo.create_comment(comment("elsewhere", quiet.id, author.id)).await.unwrap();

    assert_eq!(repo.list_comments_by_article(post.id, page(3, 4)).await.unwrap().len(), 1);
    let second = repo.list_comments_by_article(post.id, page(3, 2)).await.unwrap();
    assert_eq!(second.len(), 3);
    assert!(second.iter().all(|c| c.article.id == post.id));

    let newest = repo.list_comments_by_article(post.id, page(1, 1)).await.unwrap();
    assert_eq!(newest[0].content, "c9");
    assert_eq!(newest[0].article.comment_count, 10);

    assert!(repo.list_comments(page(5, 1)).await.unwrap().len() <= 5);
    assert!(repo.list_comments_by_article(-1, page(10, 1)).await.unwrap().is_empty());
}
