use super::card::bio_preview;
use crate::config::Config;
use crate::store::traits::SavedCandidate;
use crate::store::{SavedListStore, SqliteSavedList};
use anyhow::Result;
use console::style;

pub async fn run_list(config: &Config) -> Result<()> {
    let store = SqliteSavedList::open(&config.workspace_dir).await?;
    let saved = store.read_all(&config.list_key).await?;

    if saved.is_empty() {
        println!("No candidates saved yet.");
        println!("Run {} and save the ones you like.", style("octoscout browse").cyan());
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Saved candidates").white().bold(),
        style(format!("({})", saved.len())).dim()
    );
    for (position, entry) in saved.iter().enumerate() {
        print_entry(position, entry);
    }
    println!();
    println!(
        "  {}",
        style("Remove one with: octoscout saved remove <position>").dim()
    );
    Ok(())
}

pub async fn run_remove(config: &Config, position: usize) -> Result<()> {
    let store = SqliteSavedList::open(&config.workspace_dir).await?;
    let saved = store.read_all(&config.list_key).await?;
    let Some(entry) = saved.get(position) else {
        anyhow::bail!(
            "position {position} is out of bounds; the list has {} entries",
            saved.len()
        );
    };
    let removed = entry.record.display_name();

    store.remove_at(&config.list_key, position).await?;
    println!("Removed {removed} from the saved list.");
    Ok(())
}

fn print_entry(position: usize, entry: &SavedCandidate) {
    let record = &entry.record;
    println!();
    println!(
        "  {} {}",
        style(format!("[{position}]")).cyan(),
        style(record.display_name()).bold()
    );
    println!(
        "      {}  {}",
        pair("Location", record.location.as_deref()),
        pair("Company", record.company.as_deref()),
    );
    println!("      {}", pair("Email", record.email.as_deref()));
    if let Some(bio) = record.bio.as_deref().filter(|b| !b.is_empty()) {
        println!("      Bio: {}", bio_preview(bio));
    }
    println!(
        "      Profile: {}  {}",
        record.html_url,
        style(format!("saved {}", entry.saved_at.format("%Y-%m-%d"))).dim()
    );
}

fn pair(label: &str, value: Option<&str>) -> String {
    let value = value.filter(|v| !v.is_empty()).unwrap_or("N/A");
    format!("{label}: {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_substitutes_na_for_missing_values() {
        assert_eq!(pair("Email", None), "Email: N/A");
        assert_eq!(pair("Email", Some("")), "Email: N/A");
        assert_eq!(pair("Email", Some("a@b.c")), "Email: a@b.c");
    }
}
