// ── Core error types ──
//
// User-facing errors from rollsync-core. Callers never see raw HTTP or
// JSON failures: the `From<rollsync_api::Error>` impl translates them into
// domain variants, and store failures arrive wrapped as `Store`.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    /// The service rejected the stored credential. The credential has
    /// already been cleared by the time this is returned.
    #[error("Session expired: sign in again")]
    SessionExpired,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Write errors ─────────────────────────────────────────────────
    /// The service refused the write. `message` is the service's own text
    /// when it sent one.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    #[error("{message}")]
    Conflict { message: String },

    /// The request was refused locally and never reached the service.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Local storage ────────────────────────────────────────────────
    #[error("Local store error: {0}")]
    Store(#[from] StoreError),

    // ── Wrapped API errors ───────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The service-provided message for rejected writes.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Conflict { message } => Some(message),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rollsync_api::Error> for CoreError {
    fn from(err: rollsync_api::Error) -> Self {
        if err.is_unauthorized() {
            return CoreError::SessionExpired;
        }
        match err {
            rollsync_api::Error::Unauthorized => CoreError::SessionExpired,
            rollsync_api::Error::Rejected { status, message } => CoreError::Rejected {
                status: Some(status),
                message: message
                    .unwrap_or_else(|| format!("Request rejected by the service (HTTP {status})")),
            },
            rollsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            rollsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            rollsync_api::Error::InvalidId { id } => CoreError::ValidationFailed {
                message: format!("{id:?} is not a usable record id"),
            },
            rollsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            rollsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
