use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{Group, NewGroup};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, GroupRepository};

use super::Sequence;

/// In-memory group store keyed by id.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    store: RwLock<BTreeMap<i64, Group>>,
    ids: Sequence,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Group, i64> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                group.slug
            )));
        }

        let group = group.with_id(self.ids.next());
        store.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.store.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}
