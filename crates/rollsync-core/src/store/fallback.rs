use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{LocalStore, StoreError};

/// Typed collection access on top of a [`LocalStore`].
///
/// This is a last-resort read path for when the service cannot be asked.
/// It is never refreshed from confirmed remote data.
#[derive(Clone)]
pub struct FallbackStore {
    store: Arc<dyn LocalStore>,
}

impl FallbackStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    /// Read a named collection. A missing or unparseable collection is
    /// empty; only a failing store is an error.
    pub fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.store.get(name)? else {
            debug!(collection = name, "fallback collection absent");
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => {
                debug!(collection = name, count = records.len(), "read fallback collection");
                Ok(records)
            }
            Err(e) => {
                warn!(collection = name, error = %e, "malformed fallback collection, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn write_collection<T: Serialize>(
        &self,
        name: &str,
        records: &[T],
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: name.to_owned(),
            source,
        })?;
        self.store.set(name, &raw)
    }
}

impl std::fmt::Debug for FallbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackStore").finish_non_exhaustive()
    }
}
