use crate::directory::types::CandidateRecord;
use console::style;

/// Bio preview cap, matching the saved-table rendering.
pub const BIO_PREVIEW_CHARS: usize = 100;

/// First 100 characters of a bio, ellipsized past that.
pub fn bio_preview(bio: &str) -> String {
    if bio.chars().count() <= BIO_PREVIEW_CHARS {
        return bio.to_string();
    }
    let preview: String = bio.chars().take(BIO_PREVIEW_CHARS).collect();
    format!("{preview}...")
}

pub fn print_card(record: &CandidateRecord) {
    println!();
    println!("  {}", style(&record.login).cyan().bold());
    println!("  {}", style("─".repeat(40)).dim());

    if let Some(name) = record.name.as_deref().filter(|n| !n.is_empty()) {
        print_field("Name", name);
    }
    print_field(
        "Location",
        record.location.as_deref().unwrap_or("Not specified"),
    );
    print_field("Email", record.email.as_deref().unwrap_or("Not available"));
    if let Some(company) = record.company.as_deref().filter(|c| !c.is_empty()) {
        print_field("Company", company);
    }
    if let Some(bio) = record.bio.as_deref().filter(|b| !b.is_empty()) {
        print_field("Bio", &bio_preview(bio));
    }
    if let Some(activity) = activity_line(record) {
        print_field("Activity", &activity);
    }
    print_field("Profile", &record.html_url);
    println!();
}

fn print_field(label: &str, value: &str) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// `8 repos · 120 followers · 9 following`, omitting absent counters.
pub fn activity_line(record: &CandidateRecord) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(repos) = record.public_repos {
        parts.push(format!("{repos} repos"));
    }
    if let Some(followers) = record.followers {
        parts.push(format!("{followers} followers"));
    }
    if let Some(following) = record.following {
        parts.push(format!("{following} following"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CandidateRecord {
        CandidateRecord {
            id: 1,
            login: "octocat".into(),
            name: None,
            location: None,
            email: None,
            company: None,
            bio: None,
            avatar_url: String::new(),
            html_url: "https://github.com/octocat".into(),
            public_repos: None,
            followers: None,
            following: None,
            created_at: None,
        }
    }

    #[test]
    fn short_bio_passes_through() {
        assert_eq!(bio_preview("hello"), "hello");
    }

    #[test]
    fn long_bio_is_ellipsized_at_the_cap() {
        let bio = "x".repeat(150);
        let preview = bio_preview(&bio);
        assert_eq!(preview.chars().count(), BIO_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn bio_cap_counts_chars_not_bytes() {
        let bio = "é".repeat(101);
        let preview = bio_preview(&bio);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), BIO_PREVIEW_CHARS + 3);
    }

    #[test]
    fn activity_line_omits_absent_counters() {
        let mut r = record();
        assert!(activity_line(&r).is_none());
        r.public_repos = Some(8);
        r.following = Some(9);
        assert_eq!(activity_line(&r).unwrap(), "8 repos · 9 following");
    }
}
