// Person endpoints
//
// CRUD over `/people` plus the per-person event history.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Envelope, EventRecord, PersonPayload, PersonRecord, RecordId};

impl ApiClient {
    /// List every person visible to the current credential.
    ///
    /// `GET /people`
    pub async fn list_people(&self) -> Result<Vec<PersonRecord>, Error> {
        let url = self.url(&["people"])?;
        debug!("listing people");
        Ok(self.get(url).await?.data.unwrap_or_default())
    }

    /// Fetch a single person.
    ///
    /// `GET /people/{id}`
    pub async fn get_person(&self, id: &RecordId) -> Result<Option<PersonRecord>, Error> {
        let url = self.url(&["people", &id.to_string()])?;
        Ok(self.get(url).await?.data)
    }

    /// Enrol a person. Returns the created record when the service echoes it.
    ///
    /// `POST /people`
    pub async fn create_person(
        &self,
        payload: &PersonPayload,
    ) -> Result<Option<PersonRecord>, Error> {
        let url = self.url(&["people"])?;
        debug!(identifier = ?payload.identifier, "creating person");
        Ok(self.post(url, payload).await?.data)
    }

    /// Update a person's mutable fields.
    ///
    /// `PUT /people/{id}`
    pub async fn update_person(&self, id: &RecordId, payload: &PersonPayload) -> Result<(), Error> {
        let url = self.url(&["people", &id.to_string()])?;
        debug!(%id, "updating person");
        let _: Envelope<serde_json::Value> = self.put(url, payload).await?;
        Ok(())
    }

    /// Remove a person.
    ///
    /// `DELETE /people/{id}`
    pub async fn delete_person(&self, id: &RecordId) -> Result<(), Error> {
        let url = self.url(&["people", &id.to_string()])?;
        debug!(%id, "deleting person");
        let _: Envelope<serde_json::Value> = self.delete(url).await?;
        Ok(())
    }

    /// Event history nested under the person resource.
    ///
    /// `GET /people/{id}/events`
    pub async fn person_history(&self, id: &RecordId) -> Result<Vec<EventRecord>, Error> {
        let url = self.url(&["people", &id.to_string(), "events"])?;
        self.get_events(url).await
    }
}
