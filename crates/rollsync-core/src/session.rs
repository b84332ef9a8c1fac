// ── Session gate ──
//
// Answers one question: is a credential held right now? The answer is
// read from the local store on every check, because another context
// (a second CLI invocation, a login flow) may write the credential
// behind our back. Transitions are published on a `watch` channel.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use rollsync_api::{BearerSource, UserProfile};

use crate::store::{LocalStore, StoreError, keys};

/// Whether a credential is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Absent,
    Present,
}

impl SessionState {
    pub fn is_present(self) -> bool {
        self == Self::Present
    }
}

/// Credential holder shared by the synchronizer, the auth service, and
/// the API client (as its [`BearerSource`]).
#[derive(Clone)]
pub struct SessionGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    store: Arc<dyn LocalStore>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    /// Build a gate over `store`, seeding the published state from it.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        let initial = match read_token(store.as_ref()) {
            Ok(Some(_)) => SessionState::Present,
            Ok(None) => SessionState::Absent,
            Err(e) => {
                warn!(error = %e, "cannot read stored credential");
                SessionState::Absent
            }
        };
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(GateInner { store, state }),
        }
    }

    /// Check the store for a credential. A pure read: transitions are only
    /// published by [`establish`](Self::establish), [`clear`](Self::clear)
    /// and [`observe_storage_event`](Self::observe_storage_event).
    pub fn has_credential(&self) -> Result<bool, StoreError> {
        Ok(read_token(self.inner.store.as_ref())?.is_some())
    }

    pub fn credential(&self) -> Result<Option<SecretString>, StoreError> {
        read_token(self.inner.store.as_ref())
    }

    /// The profile stored alongside the credential, if any.
    pub fn user(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(raw) = self.inner.store.get(keys::USER)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "stored user profile is malformed");
                Ok(None)
            }
        }
    }

    /// Store a freshly issued credential (and profile) and publish
    /// `Present`.
    pub fn establish(
        &self,
        token: &SecretString,
        user: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        let store = &self.inner.store;
        store.set(keys::TOKEN, token.expose_secret())?;
        match user {
            Some(user) => {
                let raw = serde_json::to_string(user).map_err(|source| StoreError::Encode {
                    key: keys::USER.to_owned(),
                    source,
                })?;
                store.set(keys::USER, &raw)?;
            }
            None => store.remove(keys::USER)?,
        }
        info!("session established");
        self.mark(true);
        Ok(())
    }

    /// Drop the credential and profile and publish `Absent`.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.inner.store.remove(keys::TOKEN)?;
        self.inner.store.remove(keys::USER)?;
        info!("session cleared");
        self.mark(false);
        Ok(())
    }

    /// Feed an external storage-change notification into the gate. Only
    /// changes to the credential key matter.
    pub fn observe_storage_event(&self, key: &str, new_value: Option<&str>) {
        if key != keys::TOKEN {
            return;
        }
        let present = new_value.is_some_and(|v| !v.is_empty());
        debug!(present, "credential changed externally");
        self.mark(present);
    }

    /// The last published state.
    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    /// Receive every absent/present transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub(crate) fn store(&self) -> &Arc<dyn LocalStore> {
        &self.inner.store
    }

    fn mark(&self, present: bool) {
        let next = if present {
            SessionState::Present
        } else {
            SessionState::Absent
        };
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                debug!(from = %current, to = %next, "session transition");
                *current = next;
                true
            }
        });
    }
}

impl BearerSource for SessionGate {
    fn bearer(&self) -> Option<SecretString> {
        match self.credential() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "cannot read credential for request");
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn read_token(store: &dyn LocalStore) -> Result<Option<SecretString>, StoreError> {
    Ok(store
        .get(keys::TOKEN)?
        .filter(|t| !t.is_empty())
        .map(SecretString::from))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn seeded_from_store() {
        let store = Arc::new(MemoryStore::with_entries([(keys::TOKEN, "abc")]));
        let gate = SessionGate::new(store);
        assert_eq!(gate.state(), SessionState::Present);
        assert!(gate.has_credential().unwrap());
    }

    #[test]
    fn empty_token_is_absent() {
        let store = Arc::new(MemoryStore::with_entries([(keys::TOKEN, "")]));
        let gate = SessionGate::new(store);
        assert!(!gate.has_credential().unwrap());
        assert!(gate.bearer().is_none());
    }

    #[test]
    fn establish_and_clear_publish_transitions() {
        let gate = SessionGate::new(Arc::new(MemoryStore::new()));
        let mut rx = gate.subscribe();
        assert_eq!(*rx.borrow_and_update(), SessionState::Absent);

        gate.establish(&SecretString::from("tok".to_string()), None)
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Present);
        assert_eq!(
            gate.bearer().map(|s| s.expose_secret().to_owned()),
            Some("tok".to_owned())
        );

        gate.clear().unwrap();
        assert_eq!(*rx.borrow_and_update(), SessionState::Absent);
        assert!(gate.store().get(keys::TOKEN).unwrap().is_none());
    }

    #[test]
    fn storage_events_for_other_keys_are_ignored() {
        let gate = SessionGate::new(Arc::new(MemoryStore::new()));
        let mut rx = gate.subscribe();
        rx.borrow_and_update();

        gate.observe_storage_event("people", Some("[]"));
        assert!(!rx.has_changed().unwrap());

        gate.observe_storage_event(keys::TOKEN, Some("external"));
        assert_eq!(*rx.borrow_and_update(), SessionState::Present);
    }

    #[test]
    fn checking_the_credential_publishes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let gate = SessionGate::new(store.clone());
        let mut rx = gate.subscribe();
        rx.borrow_and_update();

        store.set(keys::TOKEN, "written-elsewhere").unwrap();
        assert!(gate.has_credential().unwrap());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(gate.state(), SessionState::Absent);

        gate.observe_storage_event(keys::TOKEN, Some("written-elsewhere"));
        assert_eq!(*rx.borrow_and_update(), SessionState::Present);
    }
}
