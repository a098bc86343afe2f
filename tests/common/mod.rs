//! Shared fixtures for the HTTP-level tests. Each test gets its own migrated
//! database from `#[sqlx::test]`; these helpers only build rows and requests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

use quillpost::{
    app::build_app,
    auth::{password::hash_password, services::issue_token, User},
    categories::{repo as categories, Category},
    config::{AppConfig, TokenConfig},
    posts::Post,
    state::AppState,
};

pub const PASSWORD: &str = "password123";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: String::new(),
        db_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 8080,
        app_url: "http://localhost:8080".into(),
        token: TokenConfig {
            prefix: String::new(),
        },
    }
}

pub fn app(pool: PgPool) -> Router {
    build_app(AppState::from_parts(pool, Arc::new(test_config())))
}

pub async fn create_user(pool: &PgPool, email: &str) -> User {
    let hash = hash_password(PASSWORD).unwrap();
    User::create(pool, "Test User", email, &hash).await.unwrap()
}

pub async fn token_for(pool: &PgPool, user: &User) -> String {
    issue_token(pool, "", user, "test-token").await.unwrap()
}

/// A user plus a valid bearer token for it.
pub async fn authed_user(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, &format!("user-{}@example.com", Uuid::new_v4())).await;
    let token = token_for(pool, &user).await;
    (user, token)
}

pub async fn create_category(pool: &PgPool, name: &str) -> Category {
    categories::create(pool, name).await.unwrap()
}

/// Insert a post directly, `age_secs` seconds in the past.
pub async fn insert_post(pool: &PgPool, title: &str, slug: &str, age_secs: i64) -> Post {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, slug, created_at, updated_at)
        VALUES ($1, $2, $3, now() - make_interval(secs => $4), now() - make_interval(secs => $4))
        RETURNING id, title, content, slug, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(format!("Content of {}", title))
    .bind(slug)
    .bind(age_secs as f64)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn post_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn link_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_categories")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Fire one request at the router and decode the JSON reply (`Null` if empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "expected JSON from {}, got {}",
                uri,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, json)
}
