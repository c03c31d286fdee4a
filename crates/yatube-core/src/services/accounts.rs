//! Sign-up and credential checks.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, FieldError, RepoError};
use crate::ports::{BaseRepository, PasswordService, UserRepository};

use super::REQUIRED;

const USERNAME_MAX: usize = 150;
const PASSWORD_MIN: usize = 8;

/// Raw sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new account.
    pub async fn signup(&self, input: SignupInput) -> Result<User, DomainError> {
        let (username, email) = validate(&input)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "username '{username}' is already taken"
            )));
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .create(NewUser::new(username, email, password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(msg) => DomainError::Duplicate(msg),
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::debug!("Login refused: unknown username");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(user_id = user.id, "Login refused: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }
}

fn validate(input: &SignupInput) -> Result<(String, Option<String>), DomainError> {
    let mut errors = Vec::new();

    let username = input.username.trim().to_string();
    if username.is_empty() {
        errors.push(FieldError::new("username", REQUIRED));
    } else if username.chars().count() > USERNAME_MAX {
        errors.push(FieldError::new(
            "username",
            format!("Ensure this value has at most {USERNAME_MAX} characters."),
        ));
    } else if !is_valid_username(&username) {
        errors.push(FieldError::new(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }

    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);
    if let Some(email) = &email {
        if !email.contains('@') {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        }
    }

    if input.password.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            format!("This password is too short. It must contain at least {PASSWORD_MIN} characters."),
        ));
    }

    if !errors.is_empty() {
        return Err(DomainError::Validation(errors));
    }

    Ok((username, email))
}

/// Usernames end up in profile URLs, so they are limited to URL-safe characters.
fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, email: Option<&str>, password: &str) -> SignupInput {
        SignupInput {
            username: username.to_string(),
            email: email.map(str::to_string),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_blank_email_is_dropped() {
        let (username, email) = validate(&input("author", Some("  "), "long-enough")).unwrap();
        assert_eq!(username, "author");
        assert_eq!(email, None);
    }

    #[test]
    fn test_username_with_slash_is_rejected() {
        let err = validate(&input("a/b", None, "long-enough")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref e) if e[0].field == "username"));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let err = validate(&input("author", Some("a@b.c"), "short")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref e) if e[0].field == "password"));
    }
}
