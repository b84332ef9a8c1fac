// ── Write operations ──
//
// Every write is one remote call. A success is confirmed by a full
// reload before returning; a rejection returns the error and leaves the
// dataset as it was.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use rollsync_api::RecordId;

use super::Synchronizer;
use crate::convert;
use crate::error::CoreError;
use crate::model::{
    EntityId, Person, PersonDraft, StatusEvent, StatusEventDraft, Subject, SubjectDraft,
};

impl Synchronizer {
    // ── People ───────────────────────────────────────────────────────

    /// Enrol a person. Missing fields get enrolment defaults.
    pub async fn add_person(&self, draft: PersonDraft) -> Result<Option<Person>, CoreError> {
        let payload = convert::enrolment_payload(draft, Utc::now());
        let created = self.call(self.inner.api.create_person(&payload)).await?;
        info!(identifier = payload.identifier.as_deref().unwrap_or_default(), "person added");
        self.reload_after_write("add_person").await;
        Ok(created.map(Person::from))
    }

    pub async fn update_person(&self, id: &EntityId, draft: PersonDraft) -> Result<(), CoreError> {
        let payload = convert::person_update_payload(draft);
        self.call(self.inner.api.update_person(&RecordId::from(id), &payload))
            .await?;
        info!(%id, "person updated");
        self.reload_after_write("update_person").await;
        Ok(())
    }

    pub async fn remove_person(&self, id: &EntityId) -> Result<(), CoreError> {
        self.call(self.inner.api.delete_person(&RecordId::from(id)))
            .await?;
        info!(%id, "person removed");
        self.reload_after_write("remove_person").await;
        Ok(())
    }

    // ── Subjects ─────────────────────────────────────────────────────

    /// Create a subject. Credits default to 3, department to empty.
    pub async fn add_subject(&self, draft: SubjectDraft) -> Result<Option<Subject>, CoreError> {
        let payload = convert::subject_create_payload(draft);
        let created = self.call(self.inner.api.create_subject(&payload)).await?;
        info!(code = payload.code.as_deref().unwrap_or_default(), "subject added");
        self.reload_after_write("add_subject").await;
        Ok(created.map(Subject::from))
    }

    pub async fn update_subject(
        &self,
        id: &EntityId,
        draft: SubjectDraft,
    ) -> Result<(), CoreError> {
        let payload = convert::subject_update_payload(draft);
        self.call(self.inner.api.update_subject(&RecordId::from(id), &payload))
            .await?;
        info!(%id, "subject updated");
        self.reload_after_write("update_subject").await;
        Ok(())
    }

    pub async fn remove_subject(&self, id: &EntityId) -> Result<(), CoreError> {
        self.call(self.inner.api.delete_subject(&RecordId::from(id)))
            .await?;
        info!(%id, "subject removed");
        self.reload_after_write("remove_subject").await;
        Ok(())
    }

    // ── Status events ────────────────────────────────────────────────

    /// Record one status event and append it to the session log. The id
    /// is the service's when echoed back, otherwise a synthesized one.
    pub async fn record_event(
        &self,
        draft: StatusEventDraft,
    ) -> Result<Arc<StatusEvent>, CoreError> {
        let now = Utc::now();
        let payload = convert::event_payload(&draft, now.date_naive());
        let id = self
            .call(self.inner.api.create_event(&payload))
            .await?
            .map_or_else(
                || EntityId::Text(format!("EVT{}", now.timestamp_millis())),
                EntityId::from,
            );

        let event = Arc::new(convert::accepted_event(&payload, id, now));
        self.append_events(vec![Arc::clone(&event)]);
        info!(person = %event.person_id, subject = %event.subject_id, status = %event.status, "event recorded");
        self.reload_after_write("record_event").await;
        Ok(event)
    }

    /// Record an ordered batch in one request.
    ///
    /// The service does not echo per-record ids, so each accepted record
    /// gets `"{tag}{index}"` with a per-batch tag. These ids only hold
    /// for this session. An empty batch makes no request.
    pub async fn record_events(
        &self,
        drafts: Vec<StatusEventDraft>,
    ) -> Result<Vec<Arc<StatusEvent>>, CoreError> {
        if drafts.is_empty() {
            debug!("empty event batch, nothing to send");
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let today = now.date_naive();
        let payloads: Vec<_> = drafts
            .iter()
            .map(|d| convert::event_payload(d, today))
            .collect();
        self.call(self.inner.api.bulk_create_events(&payloads))
            .await?;

        let tag = format!("EVT{}-", now.timestamp_millis());
        let events: Vec<Arc<StatusEvent>> = payloads
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let id = EntityId::Text(format!("{tag}{index}"));
                Arc::new(convert::accepted_event(p, id, now))
            })
            .collect();
        self.append_events(events.clone());
        info!(count = events.len(), "event batch recorded");
        self.reload_after_write("record_events").await;
        Ok(events)
    }

    pub async fn remove_event(&self, id: &EntityId) -> Result<(), CoreError> {
        self.call(self.inner.api.delete_event(&RecordId::from(id)))
            .await?;
        self.inner.dataset.send_if_modified(|current| {
            let before = current.events.len();
            let kept: Vec<_> = current
                .events
                .iter()
                .filter(|e| !e.id.as_ref().is_some_and(|eid| eid.matches(id)))
                .cloned()
                .collect();
            if kept.len() == before {
                return false;
            }
            let mut next = (**current).clone();
            next.events = Arc::new(kept);
            *current = Arc::new(next);
            true
        });
        info!(%id, "event removed");
        self.reload_after_write("remove_event").await;
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Run one remote call. A `401` ends the session.
    pub(crate) async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, rollsync_api::Error>>,
    ) -> Result<T, CoreError> {
        match request.await {
            Ok(value) => Ok(value),
            Err(e) if e.is_unauthorized() => {
                self.expire_session();
                Err(CoreError::SessionExpired)
            }
            Err(e) => {
                warn!(error = %e, "request failed");
                Err(e.into())
            }
        }
    }

    /// The write already succeeded; a failing reload is logged, not
    /// returned.
    async fn reload_after_write(&self, operation: &str) {
        if let Err(e) = self.reload().await {
            warn!(operation, error = %e, "reload after write failed");
        }
    }

    fn append_events(&self, new: Vec<Arc<StatusEvent>>) {
        self.inner.dataset.send_modify(|current| {
            let mut events = Vec::with_capacity(current.events.len() + new.len());
            events.extend(current.events.iter().cloned());
            events.extend(new);
            let mut next = (**current).clone();
            next.events = Arc::new(events);
            *current = Arc::new(next);
        });
    }
}
