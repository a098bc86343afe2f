//! Opaque bearer tokens.
//!
//! The client receives `"{token_id}|{secret}"` exactly once. Only the SHA-256
//! of the secret is stored, so a database dump cannot be replayed.

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Random alphanumeric characters per secret (~238 bits of entropy).
pub const SECRET_LENGTH: usize = 40;

pub fn generate_secret(prefix: &str) -> String {
    let random: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, random)
}

/// Hex-encoded SHA-256, 64 chars.
pub fn hash_token(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

pub fn plain_text(token_id: Uuid, secret: &str) -> String {
    format!("{}|{}", token_id, secret)
}

/// A token as presented in an `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub enum PresentedToken<'a> {
    /// `id|secret`: the stored row must carry this id.
    WithId { id: Uuid, secret: &'a str },
    Bare(&'a str),
}

impl<'a> PresentedToken<'a> {
    /// `None` when an id part is present but is not a UUID, or the secret is empty.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let parsed = match raw.split_once('|') {
            Some((id, secret)) => PresentedToken::WithId {
                id: Uuid::parse_str(id).ok()?,
                secret,
            },
            None => PresentedToken::Bare(raw),
        };
        (!parsed.secret().is_empty()).then_some(parsed)
    }

    pub fn secret(&self) -> &'a str {
        match self {
            PresentedToken::WithId { secret, .. } => *secret,
            PresentedToken::Bare(secret) => *secret,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            PresentedToken::WithId { id, .. } => Some(*id),
            PresentedToken::Bare(_) => None,
        }
    }
}
