use super::sampler::Sampler;
use super::state::{NextAction, SessionEvent, SessionPolicy, SessionState, SessionStatus};
use crate::directory::traits::Directory;
use crate::directory::types::{CandidateRecord, DetailOutcome};
use crate::error::DirectoryError;
use crate::store::traits::SavedListStore;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One browsing session over the directory: fetch a sampled batch, probe
/// details strictly one at a time, surface the first suitable candidate,
/// and let the caller advance, skip or commit it.
///
/// All control flow lives in [`drive`] + the pure transitions on
/// [`SessionState`]; operations here only guard entry conditions, race the
/// deadline/teardown signals, and publish the resulting state. Probing is
/// never concurrent — the upstream quota is shared, so a second in-flight
/// request would defeat the transport throttle.
pub struct BrowseSession {
    state: SessionState,
    policy: SessionPolicy,
    sampler: Sampler,
    directory: Arc<dyn Directory>,
    store: Option<Arc<dyn SavedListStore>>,
    list_key: String,
    start_deadline: Duration,
    cancel: CancellationToken,
}

impl BrowseSession {
    pub fn new(
        directory: Arc<dyn Directory>,
        sampler: Sampler,
        policy: SessionPolicy,
        start_deadline: Duration,
    ) -> Self {
        Self {
            state: SessionState::new(),
            policy,
            sampler,
            directory,
            store: None,
            list_key: String::new(),
            start_deadline,
            cancel: CancellationToken::new(),
        }
    }

    /// Wire the saved-list collaborator `commit` appends into.
    pub fn with_store(mut self, store: Arc<dyn SavedListStore>, list_key: &str) -> Self {
        self.store = Some(store);
        self.list_key = list_key.to_string();
        self
    }

    pub fn status(&self) -> &SessionStatus {
        &self.state.status
    }

    pub fn current(&self) -> Option<&CandidateRecord> {
        self.state.current.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Teardown signal: once triggered, pending results are ignored and no
    /// operation mutates the session again.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fresh window after a terminal status. Keeps the teardown signal.
    pub fn reset(&mut self) {
        self.state = SessionState::new();
    }

    /// Fetch one sampled batch and probe its leading window for the first
    /// suitable candidate. Races the whole procedure against the session
    /// deadline; a deadline hit discards any in-flight result.
    pub async fn start(&mut self) {
        if self.state.status != SessionStatus::Initializing {
            return;
        }
        let work = drive(
            self.state.clone(),
            self.policy,
            self.sampler,
            Arc::clone(&self.directory),
        );
        let cancel = self.cancel.clone();
        tokio::select! {
            biased;
            () = cancel.cancelled() => {}
            outcome = tokio::time::timeout(self.start_deadline, work) => {
                self.state = match outcome {
                    Ok(state) => state,
                    Err(_) => {
                        let secs = self.start_deadline.as_secs();
                        tracing::warn!(secs, "session start hit its deadline");
                        SessionState::new()
                            .apply(SessionEvent::DeadlineElapsed { secs }, &self.policy)
                    }
                };
            }
        }
    }

    /// Discard the current candidate and surface the next suitable one,
    /// refilling batches as needed. No-op unless Ready, so fetch sequences
    /// never overlap. Bounded by the skip bound; every path lands in
    /// Ready, NoMoreBatches or Failed.
    pub async fn advance(&mut self) {
        if self.state.status != SessionStatus::Ready {
            return;
        }
        let work = drive(
            self.state.clone().begin_advance(),
            self.policy,
            self.sampler,
            Arc::clone(&self.directory),
        );
        let cancel = self.cancel.clone();
        tokio::select! {
            biased;
            () = cancel.cancelled() => {}
            state = work => { self.state = state; }
        }
    }

    /// `advance` without touching the saved list.
    pub async fn skip(&mut self) {
        self.advance().await;
    }

    /// Append the current candidate to the saved list, then advance. Store
    /// trouble is logged and swallowed; it is not a session failure.
    pub async fn commit(&mut self) {
        if self.state.status != SessionStatus::Ready {
            return;
        }
        if let (Some(record), Some(store)) = (&self.state.current, &self.store)
            && let Err(error) = store.append(&self.list_key, record).await
        {
            tracing::warn!(%error, login = %record.login, "failed to persist committed candidate");
        }
        self.advance().await;
    }
}

/// Run the session forward until it reaches Ready or a terminal status.
/// At most one upstream request is in flight at any point; probes happen
/// in batch order.
async fn drive(
    mut state: SessionState,
    policy: SessionPolicy,
    sampler: Sampler,
    directory: Arc<dyn Directory>,
) -> SessionState {
    loop {
        let event = match state.next_action() {
            NextAction::Idle => return state,
            NextAction::FetchBatch => match sampler.sample_batch(directory.as_ref()).await {
                Ok(batch) => SessionEvent::BatchFetched(batch),
                Err(DirectoryError::RateLimited { reset_at }) => {
                    SessionEvent::RateLimited { reset_at }
                }
                Err(err) => SessionEvent::BatchFailed {
                    message: err.to_string(),
                },
            },
            NextAction::Probe { login } => match directory.fetch_detail(&login).await {
                Ok(outcome) => SessionEvent::ProbeResolved(outcome),
                Err(DirectoryError::RateLimited { reset_at }) => {
                    SessionEvent::RateLimited { reset_at }
                }
                // Anything else entity-scoped counts like an unreachable
                // profile: filtered, retried, bounded by the skip policy.
                Err(err) => SessionEvent::ProbeResolved(DetailOutcome::TransportError {
                    message: err.to_string(),
                }),
            },
        };
        state = state.apply(event, &policy);
    }
}
