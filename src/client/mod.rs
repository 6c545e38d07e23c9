//! Collaborators: the contest backend over HTTP and the identity provider.

pub mod api;
pub mod auth;
pub mod error;

pub use api::ContestApiClient;
pub use auth::{Anonymous, AuthError, EnvIdentity, Identity, StaticIdentity, UserInfo};
pub use error::ApiError;
