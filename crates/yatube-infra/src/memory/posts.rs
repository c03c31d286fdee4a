use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{NewPost, Post};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, PostFilter, PostRepository};

use super::Sequence;

/// In-memory post store. Ids only grow, so key order is insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<BTreeMap<i64, Post>>,
    ids: Sequence,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = post.with_id(self.ids.next());
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let stored = store.get_mut(&post.id).ok_or(RepoError::NotFound)?;

        stored.text = post.text;
        stored.group_id = post.group_id;
        Ok(stored.clone())
    }

    async fn latest(&self) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().next_back().cloned())
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .rev()
            .filter(|p| filter.matches(p))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_matching(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| filter.matches(p)).count() as u64)
    }
}
