use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, Value};

use yatube_core::domain::{NewPost, Post};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, PostFilter, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(id: i64, text: &str, group_id: Option<i64>) -> post::Model {
    post::Model {
        id,
        text: text.to_owned(),
        author_id: 7,
        group_id,
        pub_date: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(3, "Тестовый пост", Some(1))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(3).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.id, 3);
    assert_eq!(post.text, "Тестовый пост");
    assert_eq!(post.group_id, Some(1));
}

#[tokio::test]
async fn test_create_returns_assigned_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(12, "new_text", Some(1))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo
        .create(NewPost::new(7, "new_text".to_string(), Some(1)))
        .await
        .unwrap();

    assert_eq!(post.id, 12);
    assert_eq!(post.author_id, 7);
}

#[tokio::test]
async fn test_latest_returns_newest_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(5, "newest", None)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let latest = repo.latest().await.unwrap().expect("a latest post");
    assert_eq!(latest.id, 5);
}

#[tokio::test]
async fn test_count_matching_author() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(4)))])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let count = repo.count_matching(PostFilter::Author(7)).await.unwrap();

    assert_eq!(count, 4);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let ghost = NewPost::new(7, "editted_text".to_string(), None).with_id(404);

    let result = repo.update(ghost).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}
