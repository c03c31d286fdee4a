//! Post submission workflow and post listings.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{Group, NewPost, Post, User};
use crate::error::{DomainError, FieldError};
use crate::pagination::{Page, PageRequest};
use crate::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

use super::REQUIRED;

const INVALID_GROUP: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Raw post form as submitted: `group` is the group id as text, empty for none.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub text: String,
    pub group: Option<String>,
}

impl PostInput {
    pub fn new(text: impl Into<String>, group: Option<i64>) -> Self {
        Self {
            text: text.into(),
            group: group.map(|id| id.to_string()),
        }
    }
}

/// Validated post fields.
#[derive(Debug)]
struct CleanPost {
    text: String,
    group_id: Option<i64>,
}

/// A post together with the records it references.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

/// A single post page: the post plus how much its author has written.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub view: PostView,
    pub author_post_count: u64,
}

/// Creates, edits and lists posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    per_page: u64,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        per_page: u64,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            per_page: per_page.max(1),
        }
    }

    /// Publish a new post on behalf of `author_id`.
    pub async fn create(&self, author_id: i64, input: PostInput) -> Result<Post, DomainError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            tracing::warn!(author_id, "Post refused: author does not exist");
            return Err(DomainError::not_found("user", author_id));
        }

        let clean = self.clean(input).await?;
        let post = self
            .posts
            .create(NewPost::new(author_id, clean.text, clean.group_id))
            .await?;

        tracing::info!(post_id = post.id, author_id, group_id = ?post.group_id, "Post created");
        Ok(post)
    }

    /// Load a post for editing. Only its author may edit it.
    pub async fn editable(&self, editor_id: i64, post_id: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if !post.is_authored_by(editor_id) {
            tracing::warn!(post_id, editor_id, "Edit refused: not the author");
            return Err(DomainError::PermissionDenied);
        }

        Ok(post)
    }

    /// Replace the text and group of a post written by `editor_id`.
    pub async fn edit(
        &self,
        editor_id: i64,
        post_id: i64,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.editable(editor_id, post_id).await?;
        let clean = self.clean(input).await?;

        post.revise(clean.text, clean.group_id);
        let post = self.posts.update(post).await?;

        tracing::info!(post_id, group_id = ?post.group_id, "Post edited");
        Ok(post)
    }

    /// Groups a post form may reference.
    pub async fn selectable_groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    pub async fn detail(&self, post_id: i64) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let author_post_count = self
            .posts
            .count_matching(PostFilter::Author(post.author_id))
            .await?;
        let view = self
            .hydrate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("post {post_id} vanished")))?;

        Ok(PostDetail {
            view,
            author_post_count,
        })
    }

    /// Every post, newest first.
    pub async fn index(&self, page: Option<i64>) -> Result<Page<PostView>, DomainError> {
        self.page(PostFilter::All, page).await
    }

    pub async fn group_feed(
        &self,
        slug: &str,
        page: Option<i64>,
    ) -> Result<(Group, Page<PostView>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.page(PostFilter::Group(group.id), page).await?;
        Ok((group, page))
    }

    pub async fn profile(
        &self,
        username: &str,
        page: Option<i64>,
    ) -> Result<(User, Page<PostView>), DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let page = self.page(PostFilter::Author(author.id), page).await?;
        Ok((author, page))
    }

    async fn page(
        &self,
        filter: PostFilter,
        page: Option<i64>,
    ) -> Result<Page<PostView>, DomainError> {
        let total = self.posts.count_matching(filter).await?;
        let request = PageRequest::resolve(page, self.per_page, total);
        let posts = self
            .posts
            .list(filter, request.offset(), request.limit())
            .await?;

        Ok(request.into_page(self.hydrate(posts).await?))
    }

    /// Attach authors and groups to a batch of posts.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let author_ids: Vec<i64> = posts
            .iter()
            .map(|p| p.author_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let group_ids: Vec<i64> = posts
            .iter()
            .filter_map(|p| p.group_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<i64, User> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let groups: HashMap<i64, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!(
                        "post {} references missing user {}",
                        post.id, post.author_id
                    ))
                })?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostView {
                    post,
                    author,
                    group,
                })
            })
            .collect()
    }

    /// Validate a submitted form, reporting every bad field at once.
    async fn clean(&self, input: PostInput) -> Result<CleanPost, DomainError> {
        let mut errors = Vec::new();

        let text = input.text.trim().to_string();
        if text.is_empty() {
            errors.push(FieldError::new("text", REQUIRED));
        }

        let group_id = match input.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let found = match raw.parse::<i64>() {
                    Ok(id) => self.groups.find_by_id(id).await?.map(|g| g.id),
                    Err(_) => None,
                };
                if found.is_none() {
                    errors.push(FieldError::new("group", INVALID_GROUP));
                }
                found
            }
        };

        if !errors.is_empty() {
            tracing::debug!(?errors, "Post form rejected");
            return Err(DomainError::Validation(errors));
        }

        Ok(CleanPost { text, group_id })
    }
}
