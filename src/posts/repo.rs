use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::Post;

/// Name of the unique constraint guarding `posts.slug`.
pub const SLUG_CONSTRAINT: &str = "posts_slug_key";

/// Insert within a transaction. Returns the raw `sqlx::Error` so the caller
/// can tell a slug collision apart from other failures.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    title: &str,
    content: &str,
    slug: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, slug)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, slug, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(slug)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    title: &str,
    content: &str,
    slug: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
           SET title = $2, content = $3, slug = $4, updated_at = now()
         WHERE id = $1
        RETURNING id, title, content, slug, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(slug)
    .fetch_one(&mut **tx)
    .await
}

pub async fn find_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, created_at, updated_at
          FROM posts
         WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;
    Ok(post)
}

/// Locks the row until the transaction ends, serialising concurrent updates.
pub async fn find_by_slug_for_update(
    tx: &mut Transaction<'_, Postgres>,
    slug: &str,
) -> anyhow::Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, created_at, updated_at
          FROM posts
         WHERE slug = $1
           FOR UPDATE
        "#,
    )
    .bind(slug)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(post)
}

/// Category links go with it via `ON DELETE CASCADE`.
pub async fn delete_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM posts WHERE slug = $1")
        .bind(slug)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Newest first; id breaks ties so pages stay stable.
pub async fn list_page(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>> {
    let rows = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, created_at, updated_at
          FROM posts
         ORDER BY created_at DESC, id DESC
         LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM posts")
        .fetch_one(db)
        .await?;
    Ok(total)
}

/// Make the post's category set exactly `category_ids`.
pub async fn sync_categories_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    category_ids: &[Uuid],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;

    if !category_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO post_categories (post_id, category_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
