//! Identity provider seam.
//!
//! Tokens are issued and validated elsewhere; this crate only asks who is
//! signed in and for a bearer token to attach to backend calls.

use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no signed-in user")]
    SignedOut,
    #[error("token unavailable: {0}")]
    Token(String),
}

pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<UserInfo>;

    fn get_token(&self) -> impl Future<Output = Result<String, AuthError>> + Send;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Nobody signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn current_user(&self) -> Option<UserInfo> {
        None
    }

    async fn get_token(&self) -> Result<String, AuthError> {
        Err(AuthError::SignedOut)
    }
}

/// Fixed user and token, for operator tooling and tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: UserInfo,
    token: String,
}

impl StaticIdentity {
    pub fn new(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: UserInfo { uid: uid.into() },
            token: token.into(),
        }
    }
}

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<UserInfo> {
        Some(self.user.clone())
    }

    async fn get_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

/// Reads the bearer token from an environment variable on every request so
/// a refreshed token is picked up without restarting.
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    uid: String,
    token_env: String,
}

impl EnvIdentity {
    pub fn new(uid: impl Into<String>, token_env: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            token_env: token_env.into(),
        }
    }

    fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

impl Identity for EnvIdentity {
    fn current_user(&self) -> Option<UserInfo> {
        self.token().map(|_| UserInfo {
            uid: self.uid.clone(),
        })
    }

    async fn get_token(&self) -> Result<String, AuthError> {
        self.token()
            .ok_or_else(|| AuthError::Token(format!("{} is not set", self.token_env)))
    }
}
