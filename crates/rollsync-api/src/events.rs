// Status event endpoints
//
// Single and bulk creation, lookups by person / subject / day, aggregate
// stats, and deletion. There is no "list everything" endpoint.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    BulkEventPayload, Envelope, EventPayload, EventRecord, EventStats, RecordId, StatsQuery,
};

impl ApiClient {
    /// Record one status event. Returns the service-assigned id when the
    /// response carries one (either `data.id` or a top-level `eventId`).
    ///
    /// `POST /events`
    pub async fn create_event(&self, payload: &EventPayload) -> Result<Option<RecordId>, Error> {
        let url = self.url(&["events"])?;
        debug!(person = %payload.person_id, subject = %payload.subject_id, "recording event");
        let env: Envelope<Value> = self.post(url, payload).await?;
        Ok(created_id(&env))
    }

    /// Record an ordered batch of events in one round trip. The response
    /// does not echo per-record ids.
    ///
    /// `POST /events/bulk`
    pub async fn bulk_create_events(&self, records: &[EventPayload]) -> Result<(), Error> {
        let url = self.url(&["events", "bulk"])?;
        debug!(count = records.len(), "recording event batch");
        let _: Envelope<Value> = self.post(url, &BulkEventPayload { records }).await?;
        Ok(())
    }

    /// `GET /events/person/{id}`
    pub async fn events_for_person(&self, person_id: &RecordId) -> Result<Vec<EventRecord>, Error> {
        let url = self.url(&["events", "person", &person_id.to_string()])?;
        self.get_events(url).await
    }

    /// `GET /events/subject/{id}`
    pub async fn events_for_subject(
        &self,
        subject_id: &RecordId,
    ) -> Result<Vec<EventRecord>, Error> {
        let url = self.url(&["events", "subject", &subject_id.to_string()])?;
        self.get_events(url).await
    }

    /// `GET /events/date/{YYYY-MM-DD}`
    pub async fn events_on(&self, date: NaiveDate) -> Result<Vec<EventRecord>, Error> {
        let url = self.url(&["events", "date", &date.format("%Y-%m-%d").to_string()])?;
        self.get_events(url).await
    }

    /// `GET /events/stats`
    pub async fn event_stats(&self, query: &StatsQuery) -> Result<EventStats, Error> {
        let url = self.url(&["events", "stats"])?;
        Ok(self
            .get_with_query(url, query)
            .await?
            .data
            .unwrap_or_default())
    }

    /// `DELETE /events/{id}`
    pub async fn delete_event(&self, id: &RecordId) -> Result<(), Error> {
        let url = self.url(&["events", &id.to_string()])?;
        debug!(%id, "deleting event");
        let _: Envelope<Value> = self.delete(url).await?;
        Ok(())
    }

    /// GET an event list, decoding each record on its own so one
    /// unreadable record does not hide the rest.
    pub(crate) async fn get_events(&self, url: Url) -> Result<Vec<EventRecord>, Error> {
        let items: Vec<Value> = self.get(url).await?.data.unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable event record");
                    None
                }
            })
            .collect())
    }
}

fn created_id(env: &Envelope<Value>) -> Option<RecordId> {
    let from_data = env.data.as_ref().and_then(|d| d.get("id"));
    let from_top = env
        .extra
        .get("eventId")
        .or_else(|| env.extra.get("attendanceId"));
    from_data
        .or(from_top)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
