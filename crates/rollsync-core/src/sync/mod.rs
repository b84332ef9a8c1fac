// ── Synchronizer ──
//
// Owns the authoritative in-memory dataset. Reloads pull people and
// subjects from the service (or the fallback store when no session is
// held), writes go to the service and are confirmed by a full reload,
// and session transitions trigger a reload from a background task.

mod dataset;
mod queries;
mod writes;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rollsync_api::ApiClient;

use crate::alias::FleetView;
use crate::auth::Authenticator;
use crate::config::{ReloadPolicy, SyncConfig};
use crate::error::CoreError;
use crate::model::{Person, StatusEvent, Subject};
use crate::session::{SessionGate, SessionState};
use crate::store::{FallbackStore, LocalStore, collections};
use crate::stream::DatasetStream;

pub use dataset::{DashboardSummary, Dataset, ReloadOutcome, Snapshot, SyncState};
use dataset::snapshot;

/// The client-side data synchronization layer.
///
/// Cheaply cloneable via `Arc<SyncInner>`. Construct once per session,
/// call [`start()`](Self::start), and tear down with
/// [`shutdown()`](Self::shutdown).
#[derive(Clone)]
pub struct Synchronizer {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    api: ApiClient,
    fallback: FallbackStore,
    session: SessionGate,
    policy: ReloadPolicy,
    dataset: watch::Sender<Arc<Dataset>>,
    state: watch::Sender<SyncState>,
    /// Bumped when a reload starts.
    generation: AtomicU64,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

/// Collections gathered by one reload, before assignment.
struct Fetched {
    people: Vec<Person>,
    subjects: Vec<Subject>,
    /// Stored events, offered to an empty session log in degraded mode.
    seed_events: Option<Vec<StatusEvent>>,
    degraded: bool,
}

impl Synchronizer {
    /// Build a synchronizer for the service at `config.base_url`, keeping
    /// the credential and fallback collections in `store`. Does not load
    /// anything: call [`start()`](Self::start) or [`reload()`](Self::reload).
    pub fn new(config: &SyncConfig, store: Arc<dyn LocalStore>) -> Result<Self, CoreError> {
        let session = SessionGate::new(Arc::clone(&store));
        let api = ApiClient::new(
            config.base_url.as_str(),
            &config.transport(),
            Arc::new(session.clone()),
        )?;
        Ok(Self::assemble(api, session, store, config.reload_policy))
    }

    fn assemble(
        api: ApiClient,
        session: SessionGate,
        store: Arc<dyn LocalStore>,
        policy: ReloadPolicy,
    ) -> Self {
        let (dataset, _) = watch::channel(Arc::new(Dataset::default()));
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            inner: Arc::new(SyncInner {
                api,
                fallback: FallbackStore::new(store),
                session,
                policy,
                dataset,
                state,
                generation: AtomicU64::new(0),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load immediately if a credential is held, then follow session
    /// transitions: every absent/present change triggers a reload.
    ///
    /// Calling `start` twice does not spawn a second listener.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return Ok(());
        }

        let present = match self.inner.session.has_credential() {
            Ok(present) => present,
            Err(e) => {
                warn!(error = %e, "cannot check session at startup");
                false
            }
        };

        let rx = self.inner.session.subscribe();
        let sync = self.clone();
        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(session_watch_task(sync, rx, cancel)));
        drop(handles);

        if present {
            info!("credential found, loading");
            self.reload().await?;
        } else {
            debug!("no credential at startup, waiting for a session");
        }
        Ok(())
    }

    /// Stop background tasks and drop the dataset, including the
    /// session-local event log.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.dataset.send_replace(Arc::new(Dataset::default()));
        self.inner.state.send_replace(SyncState::Idle);
        debug!("synchronizer shut down");
    }

    // ── Reload ───────────────────────────────────────────────────────

    /// Rebuild people and subjects wholesale.
    ///
    /// With a credential both are fetched concurrently; a failed fetch
    /// leaves only that collection empty and the result is not degraded.
    /// Without one (or when the session check itself fails) both come
    /// from the fallback store and the result is degraded.
    ///
    /// A `401` on either fetch clears the credential, assigns the
    /// fallback view, and returns [`CoreError::SessionExpired`]. A
    /// failing fallback store is an error and the previous dataset stays.
    pub async fn reload(&self) -> Result<ReloadOutcome, CoreError> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_replace(SyncState::Loading);
        debug!(generation, "reload started");

        let mut expired = false;
        let fetched = match self.inner.session.has_credential() {
            Ok(true) => match self.fetch_remote().await {
                Some(remote) => Ok(remote),
                None => {
                    expired = true;
                    self.read_fallback()
                }
            },
            Ok(false) => {
                debug!("no credential, reading fallback store");
                self.read_fallback()
            }
            Err(e) => {
                warn!(error = %e, "session check failed, reading fallback store");
                self.read_fallback()
            }
        };

        match fetched {
            Ok(fetched) => {
                let outcome = self.apply(generation, fetched);
                if expired {
                    return Err(CoreError::SessionExpired);
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(generation, error = %e, "reload failed, keeping previous data");
                self.inner.state.send_replace(SyncState::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Fetch both collections. `None` when the service rejected the
    /// credential; the session has been cleared by then.
    async fn fetch_remote(&self) -> Option<Fetched> {
        let api = &self.inner.api;
        let (people, subjects) = tokio::join!(api.list_people(), api.list_subjects());

        if people.as_ref().is_err_and(rollsync_api::Error::is_unauthorized)
            || subjects.as_ref().is_err_and(rollsync_api::Error::is_unauthorized)
        {
            self.expire_session();
            return None;
        }

        Some(Fetched {
            people: settle(collections::PEOPLE, people),
            subjects: settle(collections::SUBJECTS, subjects),
            seed_events: None,
            degraded: false,
        })
    }

    fn read_fallback(&self) -> Result<Fetched, CoreError> {
        let fallback = &self.inner.fallback;
        Ok(Fetched {
            people: fallback.read_collection(collections::PEOPLE)?,
            subjects: fallback.read_collection(collections::SUBJECTS)?,
            seed_events: Some(fallback.read_collection(collections::EVENTS)?),
            degraded: true,
        })
    }

    /// Assign a reload's result in a single send.
    fn apply(&self, generation: u64, fetched: Fetched) -> ReloadOutcome {
        let Fetched {
            people,
            subjects,
            seed_events,
            degraded,
        } = fetched;
        let (people_count, subjects_count) = (people.len(), subjects.len());
        let people = snapshot(people);
        let subjects = snapshot(subjects);

        let policy = self.inner.policy;
        let latest = &self.inner.generation;
        let applied = self.inner.dataset.send_if_modified(|current| {
            if policy == ReloadPolicy::DiscardStale && latest.load(Ordering::SeqCst) != generation
            {
                return false;
            }
            let events = match seed_events {
                Some(seed) if current.events.is_empty() && !seed.is_empty() => snapshot(seed),
                _ => Arc::clone(&current.events),
            };
            *current = Arc::new(Dataset {
                people,
                subjects,
                events,
                degraded,
                generation,
                loaded_at: Some(Utc::now()),
            });
            true
        });

        if applied {
            self.inner
                .state
                .send_replace(SyncState::Loaded { degraded });
            info!(
                generation,
                degraded,
                people = people_count,
                subjects = subjects_count,
                "dataset reloaded"
            );
        } else {
            debug!(generation, "newer reload in flight, discarding result");
        }

        ReloadOutcome {
            generation,
            degraded,
            people: people_count,
            subjects: subjects_count,
            applied,
        }
    }

    // ── Session ──────────────────────────────────────────────────────

    /// The service rejected the credential: drop it so the caller is
    /// forced to sign in again.
    pub(crate) fn expire_session(&self) {
        warn!("credential rejected by the service, clearing session");
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "failed to clear rejected credential");
        }
    }

    pub fn session(&self) -> &SessionGate {
        &self.inner.session
    }

    /// Login/logout service sharing this synchronizer's session.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.inner.api.clone(), self.inner.session.clone())
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn fallback(&self) -> &FallbackStore {
        &self.inner.fallback
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.inner.policy
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.inner.dataset.borrow())
    }

    pub fn people(&self) -> Snapshot<Person> {
        Arc::clone(&self.inner.dataset.borrow().people)
    }

    pub fn subjects(&self) -> Snapshot<Subject> {
        Arc::clone(&self.inner.dataset.borrow().subjects)
    }

    pub fn events(&self) -> Snapshot<StatusEvent> {
        Arc::clone(&self.inner.dataset.borrow().events)
    }

    pub fn is_degraded(&self) -> bool {
        self.inner.dataset.borrow().degraded
    }

    pub fn state(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    /// Follow whole-dataset changes.
    pub fn subscribe(&self) -> DatasetStream {
        DatasetStream::new(self.inner.dataset.subscribe())
    }

    /// The same data and operations under the fleet vocabulary.
    pub fn fleet(&self) -> FleetView {
        FleetView::new(self.clone())
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("api", &self.inner.api)
            .field("policy", &self.inner.policy)
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Convert one fetch result, substituting an empty collection on failure.
fn settle<R, T: From<R>>(collection: &str, result: Result<Vec<R>, rollsync_api::Error>) -> Vec<T> {
    match result {
        Ok(records) => {
            debug!(collection, count = records.len(), "fetched");
            records.into_iter().map(T::from).collect()
        }
        Err(e) => {
            warn!(collection, error = %e, "fetch failed, substituting empty collection");
            Vec::new()
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Reload on every session transition until cancelled.
async fn session_watch_task(
    sync: Synchronizer,
    mut rx: watch::Receiver<SessionState>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *rx.borrow_and_update();
                info!(%state, "session changed, reloading");
                if let Err(e) = sync.reload().await {
                    warn!(error = %e, "reload after session change failed");
                }
            }
        }
    }
}
