// Subject endpoints
//
// CRUD over `/subjects`.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Envelope, RecordId, SubjectPayload, SubjectRecord};

impl ApiClient {
    /// List every subject.
    ///
    /// `GET /subjects`
    pub async fn list_subjects(&self) -> Result<Vec<SubjectRecord>, Error> {
        let url = self.url(&["subjects"])?;
        debug!("listing subjects");
        Ok(self.get(url).await?.data.unwrap_or_default())
    }

    /// Fetch a single subject.
    ///
    /// `GET /subjects/{id}`
    pub async fn get_subject(&self, id: &RecordId) -> Result<Option<SubjectRecord>, Error> {
        let url = self.url(&["subjects", &id.to_string()])?;
        Ok(self.get(url).await?.data)
    }

    /// Create a subject.
    ///
    /// `POST /subjects`
    pub async fn create_subject(
        &self,
        payload: &SubjectPayload,
    ) -> Result<Option<SubjectRecord>, Error> {
        let url = self.url(&["subjects"])?;
        debug!(code = ?payload.code, "creating subject");
        Ok(self.post(url, payload).await?.data)
    }

    /// Update a subject.
    ///
    /// `PUT /subjects/{id}`
    pub async fn update_subject(
        &self,
        id: &RecordId,
        payload: &SubjectPayload,
    ) -> Result<(), Error> {
        let url = self.url(&["subjects", &id.to_string()])?;
        debug!(%id, "updating subject");
        let _: Envelope<serde_json::Value> = self.put(url, payload).await?;
        Ok(())
    }

    /// Remove a subject. Events and owner links pointing at it are left as-is.
    ///
    /// `DELETE /subjects/{id}`
    pub async fn delete_subject(&self, id: &RecordId) -> Result<(), Error> {
        let url = self.url(&["subjects", &id.to_string()])?;
        debug!(%id, "deleting subject");
        let _: Envelope<serde_json::Value> = self.delete(url).await?;
        Ok(())
    }
}
