use super::filter::SuitabilityPolicy;
use crate::directory::types::{CandidateRecord, DetailOutcome, UserStub};
use chrono::{DateTime, Utc};

/// Bounds governing one browse session.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// How many entries of the initial batch `start` may probe.
    pub probe_window: usize,
    /// Consecutive non-suitable probes tolerated while advancing.
    pub skip_bound: u32,
    pub suitability: SuitabilityPolicy,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            probe_window: 10,
            skip_bound: 20,
            suitability: SuitabilityPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Ready,
    Loading,
    NoMoreBatches,
    NoSuitableInWindow,
    Failed(FailureReason),
}

impl SessionStatus {
    /// Terminal states require a caller-initiated reset; no operation
    /// leaves them.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoMoreBatches | Self::NoSuitableInWindow | Self::Failed(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    RateLimited { reset_at: DateTime<Utc> },
    SkipBoundExceeded { attempts: u32 },
    Timeout { secs: u64 },
    Upstream { message: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited { reset_at } => {
                let local = reset_at.with_timezone(&chrono::Local);
                write!(f, "rate limit exceeded, resets at {}", local.format("%H:%M:%S"))
            }
            Self::SkipBoundExceeded { attempts } => {
                write!(f, "no suitable candidates after {attempts} attempts")
            }
            Self::Timeout { secs } => write!(f, "loading timed out after {secs}s"),
            Self::Upstream { message } => write!(f, "failed to load candidates: {message}"),
        }
    }
}

/// Everything the browse session fetched or observed. One value per
/// session; mutated only through [`SessionState::apply`] and discarded on
/// session end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub batch: Vec<UserStub>,
    /// Index into `batch`; equal to `batch.len()` when exhausted.
    pub cursor: usize,
    pub skip_count: u32,
    pub current: Option<CandidateRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Observation the async driver feeds into the transition function.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    BatchFetched(Vec<UserStub>),
    BatchFailed { message: String },
    ProbeResolved(DetailOutcome),
    RateLimited { reset_at: DateTime<Utc> },
    DeadlineElapsed { secs: u64 },
}

/// What the driver should do next, derived purely from the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    FetchBatch,
    Probe { login: String },
    Idle,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Initializing,
            batch: Vec::new(),
            cursor: 0,
            skip_count: 0,
            current: None,
        }
    }

    fn failed(mut self, reason: FailureReason) -> Self {
        self.status = SessionStatus::Failed(reason);
        self.current = None;
        self
    }

    fn ready(mut self, record: CandidateRecord) -> Self {
        self.status = SessionStatus::Ready;
        self.current = Some(record);
        self.skip_count = 0;
        self
    }

    /// Entries of the current batch the initial probe sequence may touch.
    fn probe_window(&self, policy: &SessionPolicy) -> usize {
        policy.probe_window.min(self.batch.len())
    }

    /// Begin an advance: only meaningful from Ready (no-op otherwise, so
    /// overlapping fetch sequences cannot start). Clears the candidate and
    /// moves the cursor past it.
    pub fn begin_advance(mut self) -> Self {
        if self.status != SessionStatus::Ready {
            return self;
        }
        self.status = SessionStatus::Loading;
        self.current = None;
        self.cursor += 1;
        self
    }

    /// Pure transition function. Events that make no sense in the current
    /// status leave the state untouched; terminal states absorb everything.
    pub fn apply(self, event: SessionEvent, policy: &SessionPolicy) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        match event {
            SessionEvent::BatchFetched(batch) => self.on_batch(batch),
            SessionEvent::BatchFailed { message } => {
                self.failed(FailureReason::Upstream { message })
            }
            SessionEvent::ProbeResolved(outcome) => self.on_probe(&outcome, policy),
            SessionEvent::RateLimited { reset_at } => {
                self.failed(FailureReason::RateLimited { reset_at })
            }
            SessionEvent::DeadlineElapsed { secs } => self.failed(FailureReason::Timeout { secs }),
        }
    }

    fn on_batch(mut self, batch: Vec<UserStub>) -> Self {
        match self.status {
            SessionStatus::Initializing | SessionStatus::Loading => {
                if batch.is_empty() {
                    self.status = SessionStatus::NoMoreBatches;
                    self.current = None;
                    return self;
                }
                self.batch = batch;
                self.cursor = 0;
                self
            }
            _ => self,
        }
    }

    fn on_probe(mut self, outcome: &DetailOutcome, policy: &SessionPolicy) -> Self {
        match self.status {
            SessionStatus::Initializing => {
                if policy.suitability.is_suitable(outcome)
                    && let DetailOutcome::Found(record) = outcome
                {
                    // Cursor stays on the winning index.
                    return self.ready(record.clone());
                }
                self.cursor += 1;
                if self.cursor >= self.probe_window(policy) {
                    self.status = SessionStatus::NoSuitableInWindow;
                }
                self
            }
            SessionStatus::Loading => {
                if policy.suitability.is_suitable(outcome)
                    && let DetailOutcome::Found(record) = outcome
                {
                    return self.ready(record.clone());
                }
                self.skip_count += 1;
                if self.skip_count > policy.skip_bound {
                    let attempts = self.skip_count;
                    return self.failed(FailureReason::SkipBoundExceeded { attempts });
                }
                self.cursor += 1;
                self
            }
            _ => self,
        }
    }

    /// Derive the driver's next move. `Idle` means the session reached
    /// Ready or a terminal status and the driver must stop.
    pub fn next_action(&self) -> NextAction {
        match self.status {
            SessionStatus::Initializing => {
                if self.batch.is_empty() {
                    NextAction::FetchBatch
                } else {
                    NextAction::Probe {
                        login: self.batch[self.cursor].login.clone(),
                    }
                }
            }
            SessionStatus::Loading => {
                if self.cursor >= self.batch.len() {
                    NextAction::FetchBatch
                } else {
                    NextAction::Probe {
                        login: self.batch[self.cursor].login.clone(),
                    }
                }
            }
            SessionStatus::Ready
            | SessionStatus::NoMoreBatches
            | SessionStatus::NoSuitableInWindow
            | SessionStatus::Failed(_) => NextAction::Idle,
        }
    }
}
