//! Async client for the roster service REST API.
//!
//! One request function per entity type and operation, typed envelopes,
//! and a distinguished [`Error::Unauthorized`] for `401` responses. The
//! client has no retry, caching, or session logic of its own: callers in
//! `rollsync-core` decide what a failure means.

pub mod auth;
pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod people;
pub mod subjects;
pub mod transport;

pub use auth::{BearerSource, NoBearer, StaticBearer};
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    AuthResponse, Envelope, EventPayload, EventRecord, EventStats, LoginRequest, PersonPayload,
    PersonRecord, RecordId, Role, SignupRequest, StatsQuery, Status, SubjectPayload,
    SubjectRecord, UserProfile,
};
pub use transport::{TlsMode, TransportConfig};
