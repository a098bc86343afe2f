use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Join row used when batch-loading categories for a page of posts.
#[derive(Debug, Clone, FromRow)]
pub struct PostCategoryRow {
    pub post_id: Uuid,
    #[sqlx(flatten)]
    pub category: Category,
}
