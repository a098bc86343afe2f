pub mod dto;
pub mod handlers;
pub mod pagination;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod slug;

use crate::state::AppState;
use axum::Router;

pub use repo_types::Post;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::posts_routes())
}
