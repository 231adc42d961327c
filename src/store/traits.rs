use crate::directory::types::CandidateRecord;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One saved-list entry: the committed record plus when it was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCandidate {
    pub record: CandidateRecord,
    pub saved_at: DateTime<Utc>,
}

/// Durable, ordered saved lists keyed by list name.
///
/// Append-only from the session's perspective; removal happens only by
/// explicit position. Implementations must hand records back in the order
/// they were appended. The browse session writes through `append` and
/// never reads.
#[async_trait]
pub trait SavedListStore: Send + Sync {
    async fn append(&self, list_key: &str, record: &CandidateRecord) -> Result<(), StoreError>;

    async fn read_all(&self, list_key: &str) -> Result<Vec<SavedCandidate>, StoreError>;

    async fn remove_at(&self, list_key: &str, position: usize) -> Result<(), StoreError>;
}
