use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::error::{AppError, Result};

/// Who is asking, as far as the HTTP layer can tell.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub bearer_token: Option<String>,
}

impl Actor {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let bearer_token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        Self { bearer_token }
    }
}

/// Entity a write request is about to touch.
#[derive(Debug, Clone, Copy)]
pub enum MutationTarget<'a> {
    Connect { address: Option<&'a str> },
    Nickname { address: &'a str },
    RecordGame { wallet_address: Option<&'a str> },
}

/// Decides whether `actor` may perform a write. The core services trust the
/// caller, so every mutating handler asks the guard first.
pub trait MutationGuard: Send + Sync {
    fn authorize(&self, actor: &Actor, target: &MutationTarget<'_>) -> Result<()>;
}

pub struct AllowAll;

impl MutationGuard for AllowAll {
    fn authorize(&self, _actor: &Actor, _target: &MutationTarget<'_>) -> Result<()> {
        Ok(())
    }
}

/// Writes require `Authorization: Bearer <token>` matching the configured token.
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl MutationGuard for BearerToken {
    fn authorize(&self, actor: &Actor, target: &MutationTarget<'_>) -> Result<()> {
        match actor.bearer_token.as_deref() {
            Some(token) if token == self.token => Ok(()),
            Some(_) => {
                tracing::warn!("Rejected write with invalid token: {:?}", target);
                Err(AppError::AuthError("Invalid token".to_string()))
            }
            None => Err(AppError::AuthError(
                "Authentication credentials were not provided".to_string(),
            )),
        }
    }
}
