use super::types::{DetailOutcome, UserStub};
use crate::error::DirectoryError;
use async_trait::async_trait;

/// Authenticated access to the paginated user directory.
///
/// Implementations own throttling against the shared upstream quota.
/// `fetch_detail` folds entity-scoped failures (missing user, non-person
/// entity, plain transport trouble) into [`DetailOutcome`] values; only
/// session-scoped signals — rate limiting above all — come back as `Err`.
#[async_trait]
pub trait Directory: Send + Sync {
    /// One page of stub entries starting after `since_id`, in directory
    /// order. Fetched atomically; an empty page means the window is past
    /// the end of the identifier space.
    async fn list_batch(
        &self,
        since_id: u64,
        page_size: u32,
    ) -> Result<Vec<UserStub>, DirectoryError>;

    /// The full record behind one stub.
    async fn fetch_detail(&self, login: &str) -> Result<DetailOutcome, DirectoryError>;
}
