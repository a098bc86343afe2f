use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        password::{verify_dummy, verify_password},
        repo_types::{AccessToken, User},
        tokens::{self, PresentedToken},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Token name recorded for sessions opened through `/login`.
pub const LOGIN_TOKEN_NAME: &str = "api-token";

/// Persist a new token for `user` and return its one-time plaintext.
pub async fn issue_token(
    db: &PgPool,
    prefix: &str,
    user: &User,
    name: &str,
) -> anyhow::Result<String> {
    let id = Uuid::new_v4();
    let secret = tokens::generate_secret(prefix);
    AccessToken::create(db, id, user.id, name, &tokens::hash_token(&secret)).await?;
    debug!(user_id = %user.id, token_id = %id, "access token issued");
    Ok(tokens::plain_text(id, &secret))
}

/// Check credentials and open a new session.
pub async fn login(state: &AppState, email: &str, password: &str) -> ApiResult<(User, String)> {
    let Some(user) = User::find_by_email(&state.db, email).await? else {
        verify_dummy(password);
        warn!(email = %email, "login unknown email");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::invalid_credentials());
    }

    let token = issue_token(&state.db, &state.config.token.prefix, &user, LOGIN_TOKEN_NAME).await?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

/// Resolve a presented bearer token to its user and stored token row.
pub async fn authenticate(db: &PgPool, presented: &str) -> ApiResult<(User, AccessToken)> {
    let presented = PresentedToken::parse(presented).ok_or(ApiError::Unauthenticated)?;

    let token = AccessToken::find_by_hash(db, &tokens::hash_token(presented.secret()))
        .await?
        .filter(|t| presented.id().map_or(true, |id| id == t.id))
        .ok_or_else(|| {
            warn!("unknown or revoked token");
            ApiError::Unauthenticated
        })?;

    let user = User::find_by_id(db, token.user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    if let Err(e) = AccessToken::touch(db, token.id).await {
        warn!(error = %e, token_id = %token.id, "failed to record token use");
    }

    Ok((user, token))
}

/// Revoke exactly the token behind the current request.
pub async fn logout(db: &PgPool, token_id: Uuid) -> ApiResult<()> {
    if !AccessToken::delete(db, token_id).await? {
        return Err(ApiError::Unauthenticated);
    }
    info!(token_id = %token_id, "access token revoked");
    Ok(())
}
