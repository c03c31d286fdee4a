//! Data Transfer Objects - submitted forms and JSON page documents.

use serde::{Deserialize, Serialize};

// ---- submitted forms -------------------------------------------------------

/// Post create/edit form. `group` is a group id, or empty for none.
/// Any other submitted field is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// `?page=` on listings. Kept as text so junk values fall back to page 1.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

// ---- page documents --------------------------------------------------------

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub group: Option<GroupResponse>,
    pub pub_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPageResponse {
    pub group: GroupResponse,
    pub page: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: UserResponse,
    pub post_count: u64,
    pub page: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author_post_count: u64,
}

/// Values currently in a post form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: Option<i64>,
}

/// The post create/edit form page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub is_edit: bool,
    pub post_id: Option<i64>,
    pub form: PostFormValues,
    pub groups: Vec<GroupResponse>,
}

/// The login page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPageResponse {
    pub next: Option<String>,
}

/// The caller's identity as carried by the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}
