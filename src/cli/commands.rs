use clap::{Parser, Subcommand};

/// `octoscout` - Terminal talent scout for the GitHub users directory.
#[derive(Parser, Debug)]
#[command(name = "octoscout")]
#[command(version = "0.1.0")]
#[command(about = "Sample GitHub users and keep the promising ones.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse randomly sampled candidates, saving or skipping one at a time
    Browse,

    /// Inspect or edit the saved-candidates list
    Saved {
        #[command(subcommand)]
        saved_command: SavedCommands,
    },

    /// Check token, connectivity and remaining API quota
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum SavedCommands {
    /// Print the saved list in commit order
    List,

    /// Remove one entry by its list position
    Remove {
        /// Position as shown by `saved list` (0-based)
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }
}
