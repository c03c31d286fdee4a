use std::fmt;

use serde::{Deserialize, Serialize};

/// Group entity - a named category posts may be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A group that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }

    pub fn with_id(self, id: i64) -> Group {
        Group {
            id,
            title: self.title,
            slug: self.slug,
            description: self.description,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_displays_as_title() {
        let group = NewGroup::new("test_title", "test_slug", "test_descrioption").with_id(1);
        assert_eq!(group.to_string(), "test_title");
    }
}
