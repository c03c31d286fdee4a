//! Post submission workflow against the in-memory repositories.

use std::sync::Arc;

use yatube_core::DomainError;
use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, User};
use yatube_core::ports::{BaseRepository, GroupRepository, PostRepository, UserRepository};
use yatube_core::services::{PostInput, PostService};
use yatube_infra::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository};

struct Fixture {
    posts: Arc<InMemoryPostRepository>,
    service: PostService,
    user: User,
    author: User,
    group: Group,
    post: Post,
}

async fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let groups = Arc::new(InMemoryGroupRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());

    let user = users
        .create(NewUser::new("user".into(), None, "hash".into()))
        .await
        .unwrap();
    let author = users
        .create(NewUser::new("author".into(), None, "hash".into()))
        .await
        .unwrap();
    let group = groups
        .create(NewGroup::new("test_title", "test_slug", "test_descrioption"))
        .await
        .unwrap();
    let post = posts
        .create(NewPost::new(author.id, "Тестовый пост".into(), Some(group.id)))
        .await
        .unwrap();

    let service = PostService::new(posts.clone(), groups, users, 10);

    Fixture {
        posts,
        service,
        user,
        author,
        group,
        post,
    }
}

#[tokio::test]
async fn test_create_adds_exactly_one_matching_post() {
    let fx = fixture().await;
    let before = fx.posts.count().await.unwrap();

    fx.service
        .create(fx.author.id, PostInput::new("new_text", Some(fx.group.id)))
        .await
        .unwrap();

    assert_eq!(fx.posts.count().await.unwrap(), before + 1);
    let latest = fx.posts.latest().await.unwrap().unwrap();
    assert_eq!(latest.text, "new_text");
    assert_eq!(latest.author_id, fx.author.id);
    assert_eq!(latest.group_id, Some(fx.group.id));
}

#[tokio::test]
async fn test_create_without_group() {
    let fx = fixture().await;

    let post = fx
        .service
        .create(
            fx.user.id,
            PostInput {
                text: "  padded  ".into(),
                group: Some(String::new()),
            },
        )
        .await
        .unwrap();

    assert_eq!(post.text, "padded");
    assert_eq!(post.group_id, None);
}

#[tokio::test]
async fn test_create_rejects_blank_text_and_unknown_group() {
    let fx = fixture().await;
    let before = fx.posts.count().await.unwrap();

    let err = fx
        .service
        .create(
            fx.author.id,
            PostInput {
                text: "   ".into(),
                group: Some("999".into()),
            },
        )
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["text", "group"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fx.posts.count().await.unwrap(), before);
}

#[tokio::test]
async fn test_create_requires_an_existing_author() {
    let fx = fixture().await;
    let before = fx.posts.count().await.unwrap();

    let err = fx
        .service
        .create(999, PostInput::new("orphan", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "user", .. }));
    assert_eq!(fx.posts.count().await.unwrap(), before);
}

#[tokio::test]
async fn test_create_rejects_non_numeric_group() {
    let fx = fixture().await;

    let err = fx
        .service
        .create(
            fx.author.id,
            PostInput {
                text: "text".into(),
                group: Some("test_slug".into()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref e) if e[0].field == "group"));
}

#[tokio::test]
async fn test_author_edit_updates_in_place() {
    let fx = fixture().await;
    let before = fx.posts.count().await.unwrap();

    fx.service
        .edit(fx.author.id, fx.post.id, PostInput::new("editted_text", Some(fx.group.id)))
        .await
        .unwrap();

    let stored = fx.posts.find_by_id(fx.post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "editted_text");
    assert_eq!(stored.author_id, fx.author.id);
    assert_eq!(stored.group_id, Some(fx.group.id));
    assert_eq!(stored.pub_date, fx.post.pub_date);
    assert_eq!(fx.posts.count().await.unwrap(), before);
}

#[tokio::test]
async fn test_edit_is_idempotent() {
    let fx = fixture().await;
    let input = PostInput::new("editted_text", None);

    let once = fx
        .service
        .edit(fx.author.id, fx.post.id, input.clone())
        .await
        .unwrap();
    let twice = fx
        .service
        .edit(fx.author.id, fx.post.id, input)
        .await
        .unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_non_author_cannot_edit() {
    let fx = fixture().await;

    let err = fx
        .service
        .edit(fx.user.id, fx.post.id, PostInput::new("hijacked", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::PermissionDenied));
    let stored = fx.posts.find_by_id(fx.post.id).await.unwrap().unwrap();
    assert_eq!(stored, fx.post);
}

#[tokio::test]
async fn test_edit_unknown_post_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .service
        .edit(fx.author.id, 9999, PostInput::new("text", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "post", .. }));
}

#[tokio::test]
async fn test_invalid_edit_leaves_post_untouched() {
    let fx = fixture().await;

    let result = fx
        .service
        .edit(fx.author.id, fx.post.id, PostInput::new("", None))
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    let stored = fx.posts.find_by_id(fx.post.id).await.unwrap().unwrap();
    assert_eq!(stored, fx.post);
}

#[tokio::test]
async fn test_listings_are_paginated_newest_first() {
    let fx = fixture().await;
    for i in 0..12 {
        fx.service
            .create(fx.author.id, PostInput::new(format!("post {i}"), None))
            .await
            .unwrap();
    }

    let first = fx.service.index(None).await.unwrap();
    assert_eq!(first.total_items, 13);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].post.text, "post 11");
    assert_eq!(first.items[0].author.username, "author");

    let last = fx.service.index(Some(7)).await.unwrap();
    assert_eq!(last.number, 2);
    assert_eq!(last.items.len(), 3);
    assert_eq!(last.items[2].post.id, fx.post.id);
}

#[tokio::test]
async fn test_group_feed_only_lists_group_posts() {
    let fx = fixture().await;
    fx.service
        .create(fx.author.id, PostInput::new("ungrouped", None))
        .await
        .unwrap();

    let (group, page) = fx.service.group_feed("test_slug", None).await.unwrap();

    assert_eq!(group, fx.group);
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].group.as_ref().map(|g| g.slug.as_str()), Some("test_slug"));
}

#[tokio::test]
async fn test_profile_and_detail() {
    let fx = fixture().await;

    let (author, page) = fx.service.profile("author", None).await.unwrap();
    assert_eq!(author.id, fx.author.id);
    assert_eq!(page.total_items, 1);

    let detail = fx.service.detail(fx.post.id).await.unwrap();
    assert_eq!(detail.view.post, fx.post);
    assert_eq!(detail.author_post_count, 1);

    assert!(matches!(
        fx.service.profile("nobody", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.service.group_feed("missing", None).await,
        Err(DomainError::NotFound { .. })
    ));
}
