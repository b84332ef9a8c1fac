// ── Wire-to-domain conversions ──
//
// Bridges `rollsync_api` records into `rollsync_core::model` types, and
// drafts (either vocabulary) into the canonical payloads the service
// expects. Creation defaults live here so every caller gets the same ones.

use chrono::{DateTime, NaiveDate, Utc};

use rollsync_api::{
    EventPayload, EventRecord, PersonPayload, PersonRecord, RecordId, SubjectPayload,
    SubjectRecord,
};

use crate::model::{
    EntityId, Person, PersonDraft, StatusEvent, StatusEventDraft, Subject, SubjectDraft,
};

/// Credit weight given to subjects created without one.
pub const DEFAULT_CREDITS: u32 = 3;
/// Level given to people enrolled without one.
pub const DEFAULT_LEVEL: u32 = 1;

// ── Records → domain ───────────────────────────────────────────────

impl From<PersonRecord> for Person {
    fn from(r: PersonRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            identifier: r.identifier,
            name: r.name,
            email: r.email,
            phone: r.phone,
            department: r.department,
            level: r.level,
        }
    }
}

impl From<SubjectRecord> for Subject {
    fn from(r: SubjectRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            code: r.code,
            name: r.name,
            credits: r.credits,
            department: r.department,
            owner_id: r.owner_id.map(EntityId::from),
        }
    }
}

impl From<EventRecord> for StatusEvent {
    fn from(r: EventRecord) -> Self {
        Self {
            id: r.id.map(EntityId::from),
            person_id: r.person_id.into(),
            subject_id: r.subject_id.into(),
            date: r.date,
            status: r.status,
            recorded_by: r.recorded_by.map(EntityId::from),
            created_at: r.created_at,
        }
    }
}

// ── Drafts → payloads ──────────────────────────────────────────────

/// Payload for enrolling a new person. Fills the identifier
/// (`STU{millis}`), empty contact fields, and level 1 when absent. The
/// initial credential is sent only when one was given.
pub(crate) fn enrolment_payload(draft: PersonDraft, now: DateTime<Utc>) -> PersonPayload {
    PersonPayload {
        identifier: Some(
            draft
                .identifier
                .unwrap_or_else(|| format!("STU{}", now.timestamp_millis())),
        ),
        name: draft.name,
        email: draft.email,
        phone: Some(draft.phone.unwrap_or_default()),
        department: Some(draft.department.unwrap_or_default()),
        level: Some(draft.level.unwrap_or(DEFAULT_LEVEL)),
        password: draft.password,
    }
}

/// Payload for editing a person: only the fields that were given.
pub(crate) fn person_update_payload(draft: PersonDraft) -> PersonPayload {
    PersonPayload {
        identifier: draft.identifier,
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
        department: draft.department,
        level: draft.level,
        password: draft.password,
    }
}

pub(crate) fn subject_create_payload(draft: SubjectDraft) -> SubjectPayload {
    SubjectPayload {
        code: draft.code,
        name: draft.name,
        credits: Some(draft.credits.unwrap_or(DEFAULT_CREDITS)),
        department: Some(draft.department.unwrap_or_default()),
        owner_id: draft.owner_id.as_ref().map(RecordId::from),
    }
}

pub(crate) fn subject_update_payload(draft: SubjectDraft) -> SubjectPayload {
    SubjectPayload {
        code: draft.code,
        name: draft.name,
        credits: draft.credits,
        department: draft.department,
        owner_id: draft.owner_id.as_ref().map(RecordId::from),
    }
}

/// Canonical event payload. A missing date becomes `today`.
pub(crate) fn event_payload(draft: &StatusEventDraft, today: NaiveDate) -> EventPayload {
    EventPayload {
        person_id: RecordId::from(&draft.person_id),
        subject_id: RecordId::from(&draft.subject_id),
        date: draft.date.unwrap_or(today),
        status: draft.status,
        recorded_by: draft.recorded_by.as_ref().map(RecordId::from),
    }
}

/// The local log entry for an event the service accepted.
pub(crate) fn accepted_event(
    payload: &EventPayload,
    id: EntityId,
    now: DateTime<Utc>,
) -> StatusEvent {
    StatusEvent {
        id: Some(id),
        person_id: payload.person_id.clone().into(),
        subject_id: payload.subject_id.clone().into(),
        date: payload.date,
        status: payload.status,
        recorded_by: payload.recorded_by.clone().map(EntityId::from),
        created_at: Some(now),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::TimeZone;
    use secrecy::ExposeSecret;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn enrolment_fills_defaults() {
        let payload = enrolment_payload(PersonDraft::named("Ann"), at_millis(1_700_000_000_123));
        assert_eq!(payload.identifier.as_deref(), Some("STU1700000000123"));
        assert_eq!(payload.phone.as_deref(), Some(""));
        assert_eq!(payload.department.as_deref(), Some(""));
        assert_eq!(payload.level, Some(DEFAULT_LEVEL));
        assert!(payload.password.is_none());
    }

    #[test]
    fn enrolment_keeps_given_fields() {
        let draft = PersonDraft {
            identifier: Some("P1".into()),
            level: Some(4),
            password: Some(secrecy::SecretString::from("pw".to_string())),
            ..PersonDraft::named("Ann")
        };
        let payload = enrolment_payload(draft, Utc::now());
        assert_eq!(payload.identifier.as_deref(), Some("P1"));
        assert_eq!(payload.level, Some(4));
        assert_eq!(
            payload.password.as_ref().map(|p| p.expose_secret().to_owned()),
            Some("pw".to_owned())
        );
    }

    #[test]
    fn update_payload_does_not_default() {
        let payload = person_update_payload(PersonDraft::named("Ann"));
        assert!(payload.identifier.is_none());
        assert!(payload.level.is_none());
        assert!(payload.phone.is_none());
    }

    #[test]
    fn subject_create_defaults_credits() {
        let payload = subject_create_payload(SubjectDraft::default());
        assert_eq!(payload.credits, Some(DEFAULT_CREDITS));
        assert_eq!(payload.department.as_deref(), Some(""));
        assert!(payload.owner_id.is_none());
    }

    #[test]
    fn event_date_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let draft = StatusEventDraft::new(EntityId::Number(1), "S1".into(), Status::Late);
        let payload = event_payload(&draft, today);
        assert_eq!(payload.date, today);
        assert_eq!(payload.subject_id, RecordId::Text("S1".into()));
    }
}
