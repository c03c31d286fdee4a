use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - a registered account, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, email: Option<String>, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Attach the id assigned by the store.
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}
