pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteSavedList;
pub use traits::{SavedCandidate, SavedListStore};
