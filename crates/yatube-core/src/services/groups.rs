//! Group administration.

use std::sync::Arc;

use crate::domain::{Group, NewGroup};
use crate::error::{DomainError, FieldError, RepoError};
use crate::ports::GroupRepository;

use super::REQUIRED;

const TITLE_MAX: usize = 200;
const SLUG_MAX: usize = 50;

/// Raw group form.
#[derive(Debug, Clone, Default)]
pub struct GroupInput {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    /// Register a new group. Slugs are unique.
    pub async fn create(&self, input: GroupInput) -> Result<Group, DomainError> {
        let group = validate(input)?;

        if self.groups.find_by_slug(&group.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "group with slug '{}' already exists",
                group.slug
            )));
        }

        let group = self.groups.create(group).await.map_err(|e| match e {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => other.into(),
        })?;

        tracing::info!(group_id = group.id, slug = %group.slug, "Group created");
        Ok(group)
    }
}

fn validate(input: GroupInput) -> Result<NewGroup, DomainError> {
    let mut errors = Vec::new();

    let title = input.title.trim().to_string();
    if title.is_empty() {
        errors.push(FieldError::new("title", REQUIRED));
    } else if title.chars().count() > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            format!("Ensure this value has at most {TITLE_MAX} characters."),
        ));
    }

    let slug = input.slug.trim().to_string();
    if slug.is_empty() {
        errors.push(FieldError::new("slug", REQUIRED));
    } else if slug.chars().count() > SLUG_MAX {
        errors.push(FieldError::new(
            "slug",
            format!("Ensure this value has at most {SLUG_MAX} characters."),
        ));
    } else if !is_valid_slug(&slug) {
        errors.push(FieldError::new(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        ));
    }

    let description = input.description.trim().to_string();
    if description.is_empty() {
        errors.push(FieldError::new("description", REQUIRED));
    }

    if !errors.is_empty() {
        return Err(DomainError::Validation(errors));
    }

    Ok(NewGroup::new(title, slug, description))
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
