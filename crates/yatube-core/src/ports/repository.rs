use async_trait::async_trait;

use crate::domain::{Group, NewGroup, NewPost, NewUser, Post, User};
use crate::error::RepoError;

/// Lookups every repository supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Total number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Store a new user. Fails with `Constraint` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch several users at once. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    /// Store a new group. Fails with `Constraint` when the slug is taken.
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(i64),
    Group(i64),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match *self {
            PostFilter::All => true,
            PostFilter::Author(id) => post.author_id == id,
            PostFilter::Group(id) => post.group_id == Some(id),
        }
    }
}

/// Post repository.
///
/// Listings and `latest` are ordered by id, newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Insert a new post and return it with its assigned id.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite the editable fields of an existing post.
    /// Fails with `NotFound` when no row has the post's id.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// The post with the highest id.
    async fn latest(&self) -> Result<Option<Post>, RepoError>;

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    async fn count_matching(&self, filter: PostFilter) -> Result<u64, RepoError>;
}
