//! Registration gate: mediates register/unregister against the contest backend.
//!
//! The gate is a small state machine (`Idle -> Pending -> Registered |
//! Unregistered | Failed -> Idle`). A call is split into [`RegistrationGate::begin`]
//! and [`RegistrationGate::complete`] so the owner can release its lock while
//! the HTTP request is in flight; [`RegistrationGate::register`] and
//! [`RegistrationGate::unregister`] chain the two for single-owner callers.
//!
//! Exactly one request is issued per invocation and nothing is retried here.

use super::policy::ContestAccessState;
use crate::client::ApiError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Classified registration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Ineligible,
    WindowClosed,
    NotFound,
    ServerFault,
    Unreachable,
    AlreadyRegistered,
}

impl ErrorKind {
    /// Transport and server faults may be retried by the user; the rest will
    /// fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerFault | Self::Unreachable)
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Ineligible => "You are not eligible to register for this contest.",
            Self::WindowClosed => "Registration for this contest is not open.",
            Self::NotFound => "This contest could not be found.",
            Self::ServerFault => "The contest service had a problem. Please try again.",
            Self::Unreachable => "Could not reach the contest service. Check your connection and try again.",
            Self::AlreadyRegistered => "You are already registered for this contest.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ineligible => "ineligible",
            Self::WindowClosed => "window_closed",
            Self::NotFound => "not_found",
            Self::ServerFault => "server_fault",
            Self::Unreachable => "unreachable",
            Self::AlreadyRegistered => "already_registered",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration state owned by one gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationStatus {
    pub is_registered: bool,
    pub last_error: Option<ErrorKind>,
}

impl RegistrationStatus {
    pub fn registered() -> Self {
        Self {
            is_registered: true,
            last_error: None,
        }
    }

    pub fn unregistered() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationAction {
    Register,
    Unregister,
}

impl RegistrationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Unregister => "unregister",
        }
    }

    fn target(&self) -> bool {
        matches!(self, Self::Register)
    }
}

/// Seam to the contest registration collaborator.
pub trait RegistrationApi: Send + Sync {
    fn submit(
        &self,
        contest_id: &str,
        action: RegistrationAction,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Pending(RegistrationAction),
    Registered,
    Unregistered,
    Failed(ErrorKind),
}

/// Informational notice attached to a recovered conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    AlreadyRegistered,
    AlreadyUnregistered,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered => "You were already registered for this contest.",
            Self::AlreadyUnregistered => "You were not registered for this contest.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub action: RegistrationAction,
    pub is_registered: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("{0} is not permitted right now")]
    NotPermitted(&'static str),
    #[error("a registration request is already in flight")]
    Busy,
    #[error("registration result no longer matches the pending request")]
    StaleTicket,
    #[error("registration rejected: {0}")]
    Rejected(ErrorKind),
}

impl GateError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Rejected(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Proof of an in-flight call, returned by `begin` and consumed by `complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub contest_id: String,
    pub action: RegistrationAction,
    generation: u64,
}

#[derive(Debug)]
pub struct RegistrationGate {
    status: RegistrationStatus,
    state: GateState,
    generation: u64,
    // Registration flag restored if the pending call fails. Set by `begin`,
    // overwritten by `refresh` while pending, consumed by `complete`.
    rollback_to: Option<bool>,
}

impl RegistrationGate {
    pub fn new(status: RegistrationStatus) -> Self {
        Self {
            status,
            state: GateState::Idle,
            generation: 0,
            rollback_to: None,
        }
    }

    /// Current status. While a call is pending this is the optimistic value.
    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GateState::Pending(_))
    }

    /// Authoritative registration flag from the backend. Always wins: while a
    /// call is pending it also becomes the value restored if that call fails.
    pub fn refresh(&mut self, is_registered: bool) {
        if self.status.is_registered != is_registered {
            tracing::debug!(is_registered, "registration status refreshed from server");
        }
        if self.is_pending() {
            self.rollback_to = Some(is_registered);
        }
        self.status = RegistrationStatus {
            is_registered,
            last_error: None,
        };
    }

    /// Return to `Idle` once the caller has shown the result.
    pub fn acknowledge(&mut self) -> bool {
        match self.state {
            GateState::Registered | GateState::Unregistered | GateState::Failed(_) => {
                self.state = GateState::Idle;
                true
            }
            GateState::Idle | GateState::Pending(_) => false,
        }
    }

    pub fn begin(
        &mut self,
        contest_id: &str,
        action: RegistrationAction,
        access: &ContestAccessState,
    ) -> Result<PendingCall, GateError> {
        if self.is_pending() {
            return Err(GateError::Busy);
        }
        let permitted = match action {
            RegistrationAction::Register => access.can_register,
            RegistrationAction::Unregister => access.can_unregister,
        };
        if !permitted {
            return Err(GateError::NotPermitted(action.as_str()));
        }
        self.generation += 1;
        self.rollback_to = Some(self.status.is_registered);
        self.status = RegistrationStatus {
            is_registered: action.target(),
            last_error: None,
        };
        self.state = GateState::Pending(action);
        tracing::info!(contest_id, action = action.as_str(), "registration request started");
        Ok(PendingCall {
            contest_id: contest_id.to_string(),
            action,
            generation: self.generation,
        })
    }

    pub fn complete(
        &mut self,
        call: PendingCall,
        result: Result<(), ApiError>,
    ) -> Result<GateOutcome, GateError> {
        if self.state != GateState::Pending(call.action) || call.generation != self.generation {
            return Err(GateError::StaleTicket);
        }
        let action = call.action;
        let rollback_to = self.rollback_to.take();
        let notice = match result {
            Ok(()) => None,
            Err(err) => match err.kind() {
                ErrorKind::AlreadyRegistered => Some(match action {
                    RegistrationAction::Register => Notice::AlreadyRegistered,
                    RegistrationAction::Unregister => Notice::AlreadyUnregistered,
                }),
                kind => {
                    tracing::warn!(
                        contest_id = %call.contest_id,
                        action = action.as_str(),
                        kind = kind.as_str(),
                        "registration request failed: {err}"
                    );
                    self.status = RegistrationStatus {
                        is_registered: rollback_to.unwrap_or(self.status.is_registered),
                        last_error: Some(kind),
                    };
                    self.state = GateState::Failed(kind);
                    return Err(GateError::Rejected(kind));
                }
            },
        };
        self.status = RegistrationStatus {
            is_registered: action.target(),
            last_error: None,
        };
        self.state = match action {
            RegistrationAction::Register => GateState::Registered,
            RegistrationAction::Unregister => GateState::Unregistered,
        };
        tracing::info!(
            contest_id = %call.contest_id,
            action = action.as_str(),
            recovered = notice.is_some(),
            "registration request completed"
        );
        Ok(GateOutcome {
            action,
            is_registered: self.status.is_registered,
            notice,
        })
    }

    pub async fn register<A: RegistrationApi>(
        &mut self,
        api: &A,
        contest_id: &str,
        access: &ContestAccessState,
    ) -> Result<GateOutcome, GateError> {
        self.run(api, contest_id, RegistrationAction::Register, access)
            .await
    }

    pub async fn unregister<A: RegistrationApi>(
        &mut self,
        api: &A,
        contest_id: &str,
        access: &ContestAccessState,
    ) -> Result<GateOutcome, GateError> {
        self.run(api, contest_id, RegistrationAction::Unregister, access)
            .await
    }

    async fn run<A: RegistrationApi>(
        &mut self,
        api: &A,
        contest_id: &str,
        action: RegistrationAction,
        access: &ContestAccessState,
    ) -> Result<GateOutcome, GateError> {
        let call = self.begin(contest_id, action, access)?;
        let result = api.submit(contest_id, action).await;
        self.complete(call, result)
    }
}

impl Default for RegistrationGate {
    fn default() -> Self {
        Self::new(RegistrationStatus::unregistered())
    }
}
