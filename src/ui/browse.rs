use super::card::print_card;
use crate::config::Config;
use crate::directory::GithubDirectory;
use crate::session::{
    BrowseSession, Sampler, SessionPolicy, SessionStatus, SuitabilityPolicy,
};
use crate::store::SqliteSavedList;
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Select};
use std::sync::Arc;
use std::time::Duration;

enum Choice {
    Save,
    Skip,
    Quit,
}

/// Interactive browse loop: one candidate at a time, save or skip, until
/// the caller quits or the session reaches a terminal status.
pub async fn run_browse(config: &Config) -> Result<()> {
    let token = config.resolve_token()?;
    let directory = Arc::new(GithubDirectory::with_base_url(
        Some(&token),
        &config.directory.base_url,
        config.directory.throttle_ms,
        config.directory.timeout_secs,
    ));
    let store = Arc::new(SqliteSavedList::open(&config.workspace_dir).await?);

    let sampler = Sampler::new(config.browse.max_user_id, config.browse.page_size);
    let policy = SessionPolicy {
        probe_window: config.browse.probe_window,
        skip_bound: config.browse.skip_bound,
        suitability: SuitabilityPolicy {
            min_profile_fields: config.browse.min_profile_fields,
        },
    };
    let mut session = BrowseSession::new(
        directory,
        sampler,
        policy,
        Duration::from_secs(config.browse.start_timeout_secs),
    )
    .with_store(store, &config.list_key);

    loop {
        if *session.status() == SessionStatus::Initializing {
            println!("{}", style("Looking for candidates...").dim());
            session.start().await;
        }

        match session.status().clone() {
            SessionStatus::Ready => {
                let login = {
                    let Some(record) = session.current() else {
                        // Ready without a candidate would break the session
                        // invariant; bail out rather than loop.
                        anyhow::bail!("session reported Ready without a candidate");
                    };
                    print_card(record);
                    record.login.clone()
                };
                match prompt_choice(&login) {
                    Choice::Save => {
                        session.commit().await;
                        println!("{}", style("Saved. Looking for the next one...").dim());
                    }
                    Choice::Skip => {
                        session.skip().await;
                        println!("{}", style("Skipped. Looking for the next one...").dim());
                    }
                    Choice::Quit => {
                        session.cancellation_token().cancel();
                        break;
                    }
                }
            }
            SessionStatus::NoSuitableInWindow => {
                println!();
                println!("No candidates with enough profile information in this window.");
                let again = Confirm::new()
                    .with_prompt("Search a fresh window?")
                    .default(true)
                    .interact()
                    .unwrap_or(false);
                if !again {
                    break;
                }
                session.reset();
            }
            SessionStatus::NoMoreBatches => {
                println!();
                println!("No more candidates available. Check back later.");
                break;
            }
            SessionStatus::Failed(reason) => {
                println!();
                println!("{} {reason}", style("Session failed:").red().bold());
                break;
            }
            SessionStatus::Initializing | SessionStatus::Loading => {
                // start() always lands in Ready or a terminal status.
                anyhow::bail!("session stalled in a transient status");
            }
        }
    }

    Ok(())
}

fn prompt_choice(login: &str) -> Choice {
    let selection = Select::new()
        .with_prompt(format!("What about {login}?"))
        .items(&["Save candidate", "Skip candidate", "Quit"])
        .default(0)
        .interact();
    match selection {
        Ok(0) => Choice::Save,
        Ok(1) => Choice::Skip,
        // Ctrl-C / closed terminal reads as quit.
        _ => Choice::Quit,
    }
}
