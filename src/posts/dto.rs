use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Post;
use crate::categories::Category;
use crate::validation::{self, FieldErrors};

pub const TITLE_MAX_CHARS: usize = 255;

pub const INVALID_CATEGORIES: &str = "The selected categories are invalid.";

/// Body of `POST /posts` and `PUT|PATCH /posts/{slug}`. Everything is
/// optional at the serde level; the create/update rules decide what is
/// required. A JSON `null` counts as not supplied. `categories` stays raw
/// JSON so a malformed id is reported on that field, not on the body.
#[derive(Debug, Default, Deserialize)]
pub struct PostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub categories: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub categories: Option<Vec<Uuid>>,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub categories: Option<Vec<Uuid>>,
}

/// Category ids from an array of UUID strings. Repeats are dropped,
/// first-seen order kept.
fn category_ids(errors: &mut FieldErrors, value: Option<&Value>) -> Option<Vec<Uuid>> {
    let Value::Array(items) = value? else {
        errors.add("categories", "The categories field must be an array.");
        return None;
    };
    let mut ids: Vec<Uuid> = Vec::with_capacity(items.len());
    for item in items {
        let Some(id) = item.as_str().and_then(|s| Uuid::parse_str(s).ok()) else {
            errors.add("categories", INVALID_CATEGORIES);
            return None;
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Some(ids)
}

impl PostPayload {
    pub fn validate_create(&self) -> Result<NewPost, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = validation::required(&mut errors, "title", self.title.as_deref());
        if let Some(title) = title {
            validation::max_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
        }
        let content = validation::required(&mut errors, "content", self.content.as_deref());
        let categories = category_ids(&mut errors, self.categories.as_ref());

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(NewPost {
                title: title.to_string(),
                content: content.to_string(),
                categories,
            }),
            _ => Err(errors),
        }
    }

    pub fn validate_update(&self) -> Result<PostChanges, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = validation::sometimes(&mut errors, "title", self.title.as_deref());
        if let Some(title) = title {
            validation::max_chars(&mut errors, "title", title, TITLE_MAX_CHARS);
        }
        let content = validation::sometimes(&mut errors, "content", self.content.as_deref());
        let categories = category_ids(&mut errors, self.categories.as_ref());

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PostChanges {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            categories,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    /// Present only when the caller loaded the relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostResponse {
    pub fn with_categories(post: Post, categories: Vec<Category>) -> Self {
        Self {
            categories: Some(categories),
            ..Self::from(post)
        }
    }
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            slug: p.slug,
            categories: None,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
