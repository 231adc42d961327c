pub mod schema;

pub use schema::{BrowseConfig, Config, DirectoryConfig};
