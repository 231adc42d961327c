use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One full profile record from the directory.
///
/// Deserialized straight off the GitHub user payload and read-only after
/// that; a copy lands in the saved list only on an explicit commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateRecord {
    pub id: u64,
    /// Unique handle. Always present and non-empty for any record that
    /// reaches the suitability filter.
    pub login: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CandidateRecord {
    /// Display name for lists: `Ada Lovelace (alovelace)` or `(alovelace)`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{name} ({})", self.login),
            None => format!("({})", self.login),
        }
    }
}

/// One stub entry of a batch listing: enough to probe the full record.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserStub {
    pub login: String,
    pub id: u64,
}

/// Result of one detail probe. Exactly one tag is ever active; a missing
/// or non-person entity is a first-class outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(CandidateRecord),
    NotFound { login: String },
    Organization { login: String },
    TransportError { message: String },
}

impl DetailOutcome {
    /// The login this probe was about, when the upstream told us.
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::Found(record) => Some(&record.login),
            Self::NotFound { login } | Self::Organization { login } => Some(login),
            Self::TransportError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn bare_record(login: &str) -> CandidateRecord {
        CandidateRecord {
            id: 1,
            login: login.into(),
            name: None,
            location: None,
            email: None,
            company: None,
            bio: None,
            avatar_url: String::new(),
            html_url: String::new(),
            public_repos: None,
            followers: None,
            following: None,
            created_at: None,
        }
    }

    #[test]
    fn record_deserializes_from_directory_payload() {
        let json = r#"{
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat",
            "name": "The Octocat",
            "company": "@github",
            "location": "San Francisco",
            "email": null,
            "bio": null,
            "public_repos": 8,
            "followers": 10000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        }"#;
        let record: CandidateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.login, "octocat");
        assert_eq!(record.company.as_deref(), Some("@github"));
        assert!(record.email.is_none());
        assert_eq!(record.followers, Some(10_000));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut record = bare_record("alovelace");
        record.name = Some("Ada Lovelace".into());
        assert_eq!(record.display_name(), "Ada Lovelace (alovelace)");
    }

    #[test]
    fn display_name_without_full_name_keeps_login_only() {
        let record = bare_record("alovelace");
        assert_eq!(record.display_name(), "(alovelace)");
    }

    #[test]
    fn outcome_login_covers_all_named_variants() {
        assert_eq!(
            DetailOutcome::NotFound {
                login: "ghost".into()
            }
            .login(),
            Some("ghost")
        );
        assert_eq!(
            DetailOutcome::Organization {
                login: "github".into()
            }
            .login(),
            Some("github")
        );
        assert_eq!(
            DetailOutcome::TransportError {
                message: "timeout".into()
            }
            .login(),
            None
        );
    }
}
