//! rollsync-core: the client-side data synchronization layer.
//!
//! Sits between [`rollsync_api`] and presentation code. The
//! [`Synchronizer`] owns the in-memory people, subjects, and status-event
//! log, reconciles them against the service or a local [`store`], and
//! exposes the same collections under the fleet vocabulary through
//! [`FleetView`].

pub mod alias;
pub mod auth;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alias::{Driver, DriverDraft, FleetView, Route, RouteDraft, TelemetryDraft, TelemetryRecord};
pub use auth::{Authenticator, Registration};
pub use config::{ReloadPolicy, SyncConfig};
pub use error::CoreError;
pub use session::{SessionGate, SessionState};
pub use store::{FallbackStore, FileStore, LocalStore, MemoryStore, StoreError};
pub use stream::DatasetStream;
pub use sync::{DashboardSummary, Dataset, ReloadOutcome, Snapshot, SyncState, Synchronizer};

pub use model::{
    EntityId, EventSummary, Person, PersonDraft, Status, StatusEvent, StatusEventDraft, Subject,
    SubjectDraft,
};

pub use rollsync_api::{TlsMode, UserProfile};
