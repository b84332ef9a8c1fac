// ── Status events ──
//
// A status event ties one person to one subject on one day. The remote
// side has no "list all" endpoint, so the synchronizer keeps a
// session-local log of the events it has seen accepted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
pub use rollsync_api::Status;

/// One accepted status event (a telemetry record, in the fleet vocabulary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    /// Service id when one was echoed back, otherwise a locally
    /// synthesized one. Synthesized ids are not durable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(alias = "studentId", alias = "student_id")]
    pub person_id: EntityId,
    #[serde(alias = "subject_id")]
    pub subject_id: EntityId,
    pub date: NaiveDate,
    pub status: Status,
    #[serde(
        default,
        alias = "markedBy",
        alias = "marked_by",
        skip_serializing_if = "Option::is_none"
    )]
    pub recorded_by: Option<EntityId>,
    /// Assigned client-side when the record is accepted.
    #[serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied when recording a status event. A missing date means
/// today (UTC).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEventDraft {
    #[serde(alias = "studentId", alias = "driverId")]
    pub person_id: EntityId,
    #[serde(alias = "routeId")]
    pub subject_id: EntityId,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub status: Status,
    #[serde(default, alias = "markedBy", alias = "teacherId")]
    pub recorded_by: Option<EntityId>,
}

impl StatusEventDraft {
    pub fn new(person_id: EntityId, subject_id: EntityId, status: Status) -> Self {
        Self {
            person_id,
            subject_id,
            date: None,
            status,
            recorded_by: None,
        }
    }

    #[must_use]
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn recorded_by(mut self, who: EntityId) -> Self {
        self.recorded_by = Some(who);
        self
    }
}

/// Attendance-style tally computed from a person's event history.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EventSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    /// `present / total` as a percentage, rounded to one decimal.
    /// Zero when there is no history.
    pub percentage: f64,
}

impl EventSummary {
    pub fn tally<'a>(events: impl IntoIterator<Item = &'a StatusEvent>) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.total += 1;
            match event.status {
                Status::Present => summary.present += 1,
                Status::Absent => summary.absent += 1,
                Status::Late => {}
            }
        }
        if summary.total > 0 {
            #[allow(clippy::cast_precision_loss)]
            let raw = summary.present as f64 / summary.total as f64 * 100.0;
            summary.percentage = (raw * 10.0).round() / 10.0;
        }
        summary
    }
}
