use thiserror::Error;

/// Top-level error type for the `rollsync-api` crate.
///
/// Covers every failure mode of a single request/response exchange:
/// authorization, transport, envelope rejection, and payload decoding.
/// `rollsync-core` maps these into domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// The service answered `401`: the bearer credential is missing,
    /// expired, or revoked. Fatal to the current session.
    #[error("Credential rejected by the service (HTTP 401)")]
    Unauthorized,

    // ── Envelope ────────────────────────────────────────────────────
    /// The service reported `success: false` or answered with a non-2xx
    /// status. `message` carries the service-provided text when present.
    #[error("Request rejected (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A record id that cannot name a single path component (empty, `.`
    /// or `..`). Nothing was sent.
    #[error("Invalid record id: {id:?}")]
    InvalidId { id: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the stored credential is no
    /// longer valid and the session must be dropped.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The service-provided message, if the service sent one.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
