// ── Dataset snapshots ──
//
// One reload produces one `Dataset`. Observers always see a whole one:
// people and subjects from the same reload, never half of each.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::{Person, StatusEvent, Subject};

/// Shared, immutable view of one collection. Cloning is an `Arc` bump.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Everything the synchronizer currently holds.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub people: Snapshot<Person>,
    pub subjects: Snapshot<Subject>,
    /// Session-local log of accepted status events. Survives reloads.
    pub events: Snapshot<StatusEvent>,
    /// Populated from the local fallback store rather than the service.
    pub degraded: bool,
    /// Generation of the reload that produced people and subjects.
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            people: Arc::new(Vec::new()),
            subjects: Arc::new(Vec::new()),
            events: Arc::new(Vec::new()),
            degraded: false,
            generation: 0,
            loaded_at: None,
        }
    }
}

impl Dataset {
    /// Events in the session log dated `day`.
    pub fn events_on(&self, day: NaiveDate) -> usize {
        self.events.iter().filter(|e| e.date == day).count()
    }
}

pub(crate) fn snapshot<T>(items: Vec<T>) -> Snapshot<T> {
    Arc::new(items.into_iter().map(Arc::new).collect())
}

/// Lifecycle of the synchronizer's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Loaded { degraded: bool },
    Error { message: String },
}

/// What a finished [`reload`](super::Synchronizer::reload) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReloadOutcome {
    pub generation: u64,
    pub degraded: bool,
    pub people: usize,
    pub subjects: usize,
    /// `false` when the result was dropped because a newer reload had
    /// already started.
    pub applied: bool,
}

/// Headline counts for a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub people: usize,
    pub subjects: usize,
    pub events_today: usize,
    pub degraded: bool,
}
