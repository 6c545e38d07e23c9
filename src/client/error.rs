use crate::contest::ErrorKind;
use thiserror::Error;

const MAX_SURFACED_MESSAGE: usize = 160;

/// Failure talking to the contest backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("contest backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network error: no response from server ({0})")]
    Transport(String),
    #[error("invalid response from contest backend: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Map to the registration taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Unreachable,
            Self::Decode(_) => ErrorKind::ServerFault,
            Self::Status { status: 404, .. } => ErrorKind::NotFound,
            Self::Status { status: 409, .. } => ErrorKind::AlreadyRegistered,
            Self::Status {
                status: 403,
                message,
            } => classify_forbidden(message),
            Self::Status { .. } => ErrorKind::ServerFault,
        }
    }

    /// Collaborator text that is safe to show an end user as-is.
    pub fn display_message(&self) -> Option<&str> {
        let message = match self {
            Self::Status { message, .. } | Self::NotFound(message) => message.trim(),
            Self::Transport(_) | Self::Decode(_) => return None,
        };
        let readable = !message.is_empty()
            && message.len() <= MAX_SURFACED_MESSAGE
            && !message.contains('\n')
            && !message.starts_with(&['{', '[', '<'][..]);
        readable.then_some(message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn classify_forbidden(message: &str) -> ErrorKind {
    let lowered = message.to_ascii_lowercase();
    let window_markers = ["closed", "ended", "not open", "not started", "deadline", "window"];
    if window_markers.iter().any(|marker| lowered.contains(marker)) {
        ErrorKind::WindowClosed
    } else {
        ErrorKind::Ineligible
    }
}

/// Pull a human message out of an error body: a bare string, a JSON object
/// with `message`, any other JSON, or the status reason as a last resort.
pub fn extract_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(text)) => text,
        Ok(serde_json::Value::Object(map)) => match map.get("message") {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => trimmed.to_string(),
        },
        Ok(_) => trimmed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
