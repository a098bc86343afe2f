use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::repo_types::{Category, PostCategoryRow};

pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name)
        VALUES ($1)
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(category)
}

/// How many of `ids` exist. Callers pass de-duplicated ids.
pub async fn count_existing<'e, E: PgExecutor<'e>>(db: E, ids: &[Uuid]) -> anyhow::Result<i64> {
    let (count,) = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM categories WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn list_for_post(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        r#"
        SELECT c.id, c.name, c.created_at, c.updated_at
          FROM categories c
          JOIN post_categories pc ON pc.category_id = c.id
         WHERE pc.post_id = $1
         ORDER BY c.name, c.id
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Categories for a batch of posts in one query, keyed by post id.
pub async fn list_for_posts(
    db: &PgPool,
    post_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<Category>>> {
    let rows = sqlx::query_as::<_, PostCategoryRow>(
        r#"
        SELECT pc.post_id, c.id, c.name, c.created_at, c.updated_at
          FROM post_categories pc
          JOIN categories c ON c.id = pc.category_id
         WHERE pc.post_id = ANY($1)
         ORDER BY c.name, c.id
        "#,
    )
    .bind(post_ids)
    .fetch_all(db)
    .await?;

    let mut by_post: HashMap<Uuid, Vec<Category>> = HashMap::new();
    for row in rows {
        by_post.entry(row.post_id).or_default().push(row.category);
    }
    Ok(by_post)
}
