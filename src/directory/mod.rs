pub mod github;
pub mod http_client;
pub mod scrub;
pub mod traits;
pub mod types;

pub use github::GithubDirectory;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::Directory;
pub use types::{CandidateRecord, DetailOutcome, UserStub};
