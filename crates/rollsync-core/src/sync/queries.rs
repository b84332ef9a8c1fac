// ── Read-side queries ──
//
// Lookups that go straight to the service rather than the dataset:
// per-person history, per-subject and per-day event lists, and stats.

use chrono::NaiveDate;
use tracing::warn;

use rollsync_api::{EventStats, RecordId, StatsQuery};

use super::{DashboardSummary, Synchronizer};
use crate::error::CoreError;
use crate::model::{EntityId, EventSummary, Person, StatusEvent, Subject};

impl Synchronizer {
    /// A person's event history, optionally narrowed to one subject.
    /// Any failure yields an empty history.
    pub async fn person_events(
        &self,
        person: &EntityId,
        subject: Option<&EntityId>,
    ) -> Vec<StatusEvent> {
        let records = match self
            .call(self.inner.api.events_for_person(&RecordId::from(person)))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(%person, error = %e, "cannot fetch event history");
                return Vec::new();
            }
        };
        records
            .into_iter()
            .map(StatusEvent::from)
            .filter(|e| subject.is_none_or(|s| e.subject_id.matches(s)))
            .collect()
    }

    /// Tally a person's history (present, absent, percentage).
    pub async fn event_stats(
        &self,
        person: &EntityId,
        subject: Option<&EntityId>,
    ) -> EventSummary {
        let history = self.person_events(person, subject).await;
        EventSummary::tally(&history)
    }

    /// Aggregate stats as computed by the service.
    pub async fn remote_event_stats(
        &self,
        person: Option<&EntityId>,
        subject: Option<&EntityId>,
    ) -> Result<EventStats, CoreError> {
        let query = StatsQuery {
            person_id: person.map(RecordId::from),
            subject_id: subject.map(RecordId::from),
        };
        self.call(self.inner.api.event_stats(&query)).await
    }

    pub async fn events_for_subject(
        &self,
        subject: &EntityId,
    ) -> Result<Vec<StatusEvent>, CoreError> {
        let records = self
            .call(self.inner.api.events_for_subject(&RecordId::from(subject)))
            .await?;
        Ok(records.into_iter().map(StatusEvent::from).collect())
    }

    pub async fn events_on(&self, day: NaiveDate) -> Result<Vec<StatusEvent>, CoreError> {
        let records = self.call(self.inner.api.events_on(day)).await?;
        Ok(records.into_iter().map(StatusEvent::from).collect())
    }

    /// Fetch one person straight from the service.
    pub async fn get_person(&self, id: &EntityId) -> Result<Option<Person>, CoreError> {
        let record = self
            .call(self.inner.api.get_person(&RecordId::from(id)))
            .await?;
        Ok(record.map(Person::from))
    }

    pub async fn get_subject(&self, id: &EntityId) -> Result<Option<Subject>, CoreError> {
        let record = self
            .call(self.inner.api.get_subject(&RecordId::from(id)))
            .await?;
        Ok(record.map(Subject::from))
    }

    /// Counts from the current dataset; events are those in the session
    /// log dated `day`.
    pub fn summary(&self, day: NaiveDate) -> DashboardSummary {
        let dataset = self.dataset();
        DashboardSummary {
            people: dataset.people.len(),
            subjects: dataset.subjects.len(),
            events_today: dataset.events_on(day),
            degraded: dataset.degraded,
        }
    }
}
