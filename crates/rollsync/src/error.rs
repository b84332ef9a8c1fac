//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rollsync_config::ConfigError;
use rollsync_core::{CoreError, StoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the service at {url}")]
    #[diagnostic(
        code(rollsync::connection_failed),
        help(
            "Check that the service is running and the base URL is right.\n\
             Reads still work offline from the local store."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(rollsync::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────
    #[error("Session expired")]
    #[diagnostic(
        code(rollsync::session_expired),
        help("The stored credential was rejected and has been cleared.\nRun: rollsync login")
    )]
    SessionExpired,

    #[error("Login failed: {message}")]
    #[diagnostic(
        code(rollsync::auth_failed),
        help("Check the email and password, and the --role you signed in with.")
    )]
    AuthFailed { message: String },

    // ── Records ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(rollsync::not_found),
        help("Run: rollsync {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(rollsync::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(code(rollsync::rejected))]
    Rejected { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rollsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rollsync::profile_not_found),
        help(
            "Create one with: rollsync config init --base-url <URL>\n\
             Or pass --base-url / set ROLLSYNC_BASE_URL."
        )
    )]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(rollsync::config))]
    Config(ConfigError),

    // ── Local store ──────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(rollsync::store),
        help("Check permissions on the store directory, or point --store-dir elsewhere.")
    )]
    Store(StoreError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(rollsync::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    #[diagnostic(code(rollsync::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::SessionExpired | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound { name },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionExpired => Self::SessionExpired,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Rejected { message, .. } | CoreError::Api { message, .. } => {
                Self::Rejected { message }
            }
            CoreError::Conflict { message } => Self::Conflict { message },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "id".into(),
                reason: message,
            },
            CoreError::Store(e) => Self::Store(e),
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
