use thiserror::Error;

use crate::outcome::{Notice, Outcome, Route};

#[derive(Error, Debug)]
pub enum PassportError {
    /// No session token in the store. Never reaches the wire.
    #[error("not authenticated")]
    Unauthenticated,

    /// The server rejected the bearer token; the local session has been destroyed.
    #[error("session expired: {message}")]
    AuthorizationExpired { message: String },

    #[error("HTTP error {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("transport error: {0}")]
    TransportUnavailable(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("overflow: {0}")]
    Overflow(String),

    #[error("session store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out after {0} ms")]
    TimedOut(u64),
}

impl PassportError {
    /// HTTP status carried by the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            PassportError::AuthorizationExpired { .. } => Some(401),
            PassportError::RequestFailed { status, .. } => Some(*status),
            PassportError::TransportUnavailable(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured outcome for the calling layer to interpret.
    pub fn outcome(&self) -> Outcome {
        match self {
            PassportError::Unauthenticated => Outcome {
                status: None,
                redirect: Some(Route::Home),
                notify: None,
            },
            PassportError::AuthorizationExpired { .. } => Outcome {
                status: Some(401),
                redirect: Some(Route::Home),
                notify: Some(Notice::session_expired()),
            },
            other => Outcome {
                status: other.status(),
                redirect: None,
                notify: None,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, PassportError>;
