use crate::directory::traits::Directory;
use crate::directory::types::UserStub;
use crate::error::DirectoryError;
use rand::Rng;

/// Random-offset window into the directory's identifier space.
///
/// Every batch starts at a fresh uniform offset rather than walking the
/// space sequentially, which would bias sampling toward early-registered
/// entities.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    /// Exclusive upper bound of the sampled id space.
    pub max_user_id: u64,
    pub page_size: u32,
}

impl Sampler {
    pub fn new(max_user_id: u64, page_size: u32) -> Self {
        Self {
            max_user_id,
            page_size,
        }
    }

    /// Uniform in `[1, max_user_id)`.
    pub fn pick_offset(&self) -> u64 {
        rand::rng().random_range(1..self.max_user_id)
    }

    /// One batch of stubs from a freshly sampled window.
    pub async fn sample_batch(
        &self,
        directory: &dyn Directory,
    ) -> Result<Vec<UserStub>, DirectoryError> {
        let since_id = self.pick_offset();
        tracing::debug!(since_id, page_size = self.page_size, "sampling window");
        directory.list_batch(since_id, self.page_size).await
    }
}
