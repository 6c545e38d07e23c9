//! HTTP client for the contest backend.
//!
//! Covers the calls the access model needs: contest listing and lookup, and
//! the registration mutation. Every request carries the signed-in user's bearer
//! token when one can be obtained; a token failure is logged and the request
//! goes out without credentials so the backend decides.

use super::auth::Identity;
use super::error::{extract_message, ApiError};
use crate::config::ApiConfig;
use crate::contest::{Contest, RegistrationAction, RegistrationApi};
use anyhow::{anyhow, Context, Result};
use reqwest::{RequestBuilder, Response, Url};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct RegistrationBody {
    action: RegistrationAction,
}

/// Thin facade over `reqwest` bound to one backend and one identity.
#[derive(Clone)]
pub struct ContestApiClient<I: Identity> {
    base: Url,
    http: reqwest::Client,
    identity: I,
}

impl<I: Identity> ContestApiClient<I> {
    pub fn from_config(cfg: &ApiConfig, identity: I) -> Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid api.base_url {}", cfg.base_url))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("api.base_url {} cannot carry paths", cfg.base_url));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("failed to build contest api client: {err:?}");
                reqwest::Client::new()
            });
        Ok(Self {
            base,
            http,
            identity,
        })
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /contests/{id}`.
    pub async fn get_contest(&self, contest_id: &str) -> Result<Contest, ApiError> {
        let url = self.endpoint(&["contests", contest_id]);
        let request = self.authorize(self.http.get(url)).await;
        let response = check(request.send().await?).await?;
        let contest = response.json::<Contest>().await.map_err(|err| {
            tracing::warn!(contest_id, "contest payload decode failed: {err}");
            ApiError::Decode(err.to_string())
        })?;
        tracing::debug!(contest_id, is_registered = contest.is_registered, "contest fetched");
        Ok(contest)
    }

    /// `GET /contests/list?page={page}`, one page of contests.
    pub async fn list_contests(&self, page: u32) -> Result<Vec<Contest>, ApiError> {
        let mut url = self.endpoint(&["contests", "list"]);
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let request = self.authorize(self.http.get(url)).await;
        let response = check(request.send().await?).await?;
        let contests = response.json::<Vec<Contest>>().await.map_err(|err| {
            tracing::warn!(page, "contest list decode failed: {err}");
            ApiError::Decode(err.to_string())
        })?;
        tracing::debug!(page, count = contests.len(), "contest list fetched");
        Ok(contests)
    }

    /// `POST /contests/{id}/registration` with `{"action": ...}`.
    pub async fn set_registration(
        &self,
        contest_id: &str,
        action: RegistrationAction,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["contests", contest_id, "registration"]);
        let request = self
            .authorize(self.http.post(url))
            .await
            .json(&RegistrationBody { action });
        check(request.send().await?).await?;
        Ok(())
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.identity.current_user().is_none() {
            return request;
        }
        match self.identity.get_token().await {
            Ok(token) => request.bearer_auth(token),
            Err(err) => {
                tracing::warn!("error getting auth token: {err}");
                request
            }
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl<I: Identity> RegistrationApi for ContestApiClient<I> {
    async fn submit(&self, contest_id: &str, action: RegistrationAction) -> Result<(), ApiError> {
        self.set_registration(contest_id, action).await
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("Unknown error");
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body, fallback);
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(message));
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
