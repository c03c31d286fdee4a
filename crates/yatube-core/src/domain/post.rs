use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters shown when a post is rendered as a label.
pub const POST_LABEL_LEN: usize = 15;

/// Post entity - a blog entry with one author and at most one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    /// Replace the editable fields. Id, author and publication date stay put.
    pub fn revise(&mut self, text: String, group_id: Option<i64>) {
        self.text = text;
        self.group_id = group_id;
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: String = self.text.chars().take(POST_LABEL_LEN).collect();
        f.write_str(&label)
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub pub_date: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post.
    pub fn new(author_id: i64, text: String, group_id: Option<i64>) -> Self {
        Self {
            text,
            author_id,
            group_id,
            pub_date: Utc::now(),
        }
    }

    pub fn with_id(self, id: i64) -> Post {
        Post {
            id,
            text: self.text,
            author_id: self.author_id,
            group_id: self.group_id,
            pub_date: self.pub_date,
        }
    }
}
