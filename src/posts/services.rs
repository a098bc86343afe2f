use sqlx::{Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{NewPost, PostChanges, PostResponse, INVALID_CATEGORIES},
    pagination::{paginate, PageRequest, Paginated},
    repo::{self, SLUG_CONSTRAINT},
    repo_types::Post,
    slug::{slug_with_suffix, unique_suffix},
};
use crate::{
    auth::User,
    categories::repo as categories,
    db::is_unique_violation,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Fresh suffixes tried before a slug collision is reported as a conflict.
pub const SLUG_MAX_ATTEMPTS: usize = 3;

fn not_found() -> ApiError {
    ApiError::NotFound("Post not found".into())
}

/// Reject the whole write if any id does not name a category.
async fn ensure_categories_exist(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> ApiResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = categories::count_existing(&mut **tx, ids).await?;
    if found != ids.len() as i64 {
        return Err(ApiError::invalid("categories", INVALID_CATEGORIES));
    }
    Ok(())
}

pub async fn list(state: &AppState, req: PageRequest, path: &str) -> ApiResult<Paginated<PostResponse>> {
    let total = repo::count(&state.db).await?;
    let posts = repo::list_page(&state.db, req.limit(), req.offset()).await?;

    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let mut by_post = categories::list_for_posts(&state.db, &ids).await?;
    let items = posts
        .into_iter()
        .map(|p| {
            let cats = by_post.remove(&p.id).unwrap_or_default();
            PostResponse::with_categories(p, cats)
        })
        .collect();

    Ok(paginate(req, total, items, path))
}

pub async fn get_by_slug(state: &AppState, slug: &str) -> ApiResult<PostResponse> {
    let post = repo::find_by_slug(&state.db, slug)
        .await?
        .ok_or_else(not_found)?;
    let cats = categories::list_for_post(&state.db, post.id).await?;
    Ok(PostResponse::with_categories(post, cats))
}

pub async fn create(state: &AppState, author: &User, new: NewPost) -> ApiResult<Post> {
    create_with(state, author, new, unique_suffix).await
}

/// [`create`] with the slug suffix drawn from `next_suffix`.
pub async fn create_with(
    state: &AppState,
    author: &User,
    new: NewPost,
    mut next_suffix: impl FnMut() -> String,
) -> ApiResult<Post> {
    for attempt in 1..=SLUG_MAX_ATTEMPTS {
        let mut tx = state.db.begin().await?;
        if let Some(ids) = &new.categories {
            ensure_categories_exist(&mut tx, ids).await?;
        }

        let slug = slug_with_suffix(&new.title, &next_suffix());
        let post = match repo::insert_tx(&mut tx, &new.title, &new.content, &slug).await {
            Ok(post) => post,
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                warn!(%slug, attempt, "slug collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(ids) = &new.categories {
            repo::sync_categories_tx(&mut tx, post.id, ids).await?;
        }
        tx.commit().await?;

        info!(post_id = %post.id, slug = %post.slug, user_id = %author.id, "post created");
        return Ok(post);
    }
    Err(ApiError::Conflict("Could not allocate a unique slug".into()))
}

pub async fn update(
    state: &AppState,
    editor: &User,
    slug: &str,
    changes: PostChanges,
) -> ApiResult<Post> {
    update_with(state, editor, slug, changes, unique_suffix).await
}

/// [`update`] with the slug suffix drawn from `next_suffix`.
pub async fn update_with(
    state: &AppState,
    editor: &User,
    slug: &str,
    changes: PostChanges,
    mut next_suffix: impl FnMut() -> String,
) -> ApiResult<Post> {
    for attempt in 1..=SLUG_MAX_ATTEMPTS {
        let mut tx = state.db.begin().await?;
        let current = repo::find_by_slug_for_update(&mut tx, slug)
            .await?
            .ok_or_else(not_found)?;
        if let Some(ids) = &changes.categories {
            ensure_categories_exist(&mut tx, ids).await?;
        }

        let title = changes.title.as_deref().unwrap_or(&current.title);
        let content = changes.content.as_deref().unwrap_or(&current.content);
        let new_slug = if title != current.title {
            slug_with_suffix(title, &next_suffix())
        } else {
            current.slug.clone()
        };

        let post = match repo::update_tx(&mut tx, current.id, title, content, &new_slug).await {
            Ok(post) => post,
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                warn!(slug = %new_slug, attempt, "slug collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(ids) = &changes.categories {
            repo::sync_categories_tx(&mut tx, post.id, ids).await?;
        }
        tx.commit().await?;

        info!(post_id = %post.id, old_slug = %slug, slug = %post.slug, user_id = %editor.id, "post updated");
        return Ok(post);
    }
    Err(ApiError::Conflict("Could not allocate a unique slug".into()))
}

pub async fn delete(state: &AppState, editor: &User, slug: &str) -> ApiResult<()> {
    if !repo::delete_by_slug(&state.db, slug).await? {
        return Err(not_found());
    }
    info!(%slug, user_id = %editor.id, "post deleted");
    Ok(())
}
