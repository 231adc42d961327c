use crate::cli::{Cli, Commands, SavedCommands};
use crate::config::Config;
use crate::directory::GithubDirectory;
use crate::ui;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use console::style;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Browse => ui::browse::run_browse(&config).await,
        Commands::Saved { saved_command } => match saved_command {
            SavedCommands::List => ui::saved::run_list(&config).await,
            SavedCommands::Remove { position } => ui::saved::run_remove(&config, position).await,
        },
        Commands::Doctor => run_doctor(&config).await,
    }
}

/// Token, connectivity and quota check. `GET /rate_limit` is free, so this
/// never burns browsing quota.
async fn run_doctor(config: &Config) -> Result<()> {
    println!("config: {}", config.config_path.display());
    println!("saved list: {} (key `{}`)", config.saved_db_path().display(), config.list_key);

    let token = match config.resolve_token() {
        Ok(token) => {
            println!("token: {}", style("present").green());
            Some(token)
        }
        Err(err) => {
            println!("token: {} — {err}", style("missing").yellow());
            None
        }
    };

    let directory = GithubDirectory::with_base_url(
        token.as_deref(),
        &config.directory.base_url,
        0, // a one-off diagnostic call needs no throttle
        config.directory.timeout_secs,
    );
    match directory.rate_limit_status().await {
        Ok(window) => {
            let reset: DateTime<Local> = DateTime::from_timestamp(window.reset, 0)
                .unwrap_or_else(Utc::now)
                .into();
            println!(
                "quota: {}/{} remaining, resets at {}",
                window.remaining,
                window.limit,
                reset.format("%H:%M:%S")
            );
            if window.remaining == 0 {
                println!("{}", style("quota exhausted; browsing will fail until reset").red());
            }
        }
        Err(err) => {
            println!("quota: {} — {err}", style("unreachable").red());
        }
    }
    Ok(())
}
