pub mod filter;
pub mod machine;
pub mod sampler;
pub mod state;

pub use filter::SuitabilityPolicy;
pub use machine::BrowseSession;
pub use sampler::Sampler;
pub use state::{FailureReason, SessionPolicy, SessionState, SessionStatus};
