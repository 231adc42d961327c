use crate::directory::types::{CandidateRecord, DetailOutcome};

/// Binary completeness threshold over the five optional profile fields.
///
/// The threshold is policy, not derivation; it ships as an explicit value
/// so callers and tests can tighten or loosen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitabilityPolicy {
    pub min_profile_fields: usize,
}

impl Default for SuitabilityPolicy {
    fn default() -> Self {
        Self {
            min_profile_fields: 2,
        }
    }
}

impl SuitabilityPolicy {
    /// Non-empty fields among {location, email, company, bio, name}.
    pub fn profile_field_count(record: &CandidateRecord) -> usize {
        [
            record.location.as_deref(),
            record.email.as_deref(),
            record.company.as_deref(),
            record.bio.as_deref(),
            record.name.as_deref(),
        ]
        .into_iter()
        .filter(|field| field.is_some_and(|value| !value.is_empty()))
        .count()
    }

    /// NotFound, Organization and TransportError are never suitable;
    /// a Found record qualifies iff it clears the field threshold.
    pub fn is_suitable(&self, outcome: &DetailOutcome) -> bool {
        match outcome {
            DetailOutcome::Found(record) => {
                Self::profile_field_count(record) >= self.min_profile_fields
            }
            DetailOutcome::NotFound { .. }
            | DetailOutcome::Organization { .. }
            | DetailOutcome::TransportError { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(fields: u8) -> CandidateRecord {
        // One bit per field: location, email, company, bio, name.
        CandidateRecord {
            id: 1,
            login: "subject".into(),
            location: (fields & 0b00001 != 0).then(|| "Berlin".into()),
            email: (fields & 0b00010 != 0).then(|| "s@example.com".into()),
            company: (fields & 0b00100 != 0).then(|| "ACME".into()),
            bio: (fields & 0b01000 != 0).then(|| "systems tinkerer".into()),
            name: (fields & 0b10000 != 0).then(|| "Subject One".into()),
            avatar_url: String::new(),
            html_url: String::new(),
            public_repos: None,
            followers: None,
            following: None,
            created_at: None,
        }
    }

    #[test]
    fn suitable_iff_two_or_more_fields_across_all_subsets() {
        let policy = SuitabilityPolicy::default();
        for fields in 0u8..32 {
            let record = record_with(fields);
            let set = fields.count_ones();
            let outcome = DetailOutcome::Found(record);
            assert_eq!(
                policy.is_suitable(&outcome),
                set >= 2,
                "subset {fields:#07b} has {set} fields set"
            );
        }
    }

    #[test]
    fn field_count_matches_popcount_across_all_subsets() {
        for fields in 0u8..32 {
            assert_eq!(
                SuitabilityPolicy::profile_field_count(&record_with(fields)),
                fields.count_ones() as usize
            );
        }
    }

    #[test]
    fn empty_strings_do_not_count() {
        let mut record = record_with(0);
        record.location = Some(String::new());
        record.email = Some(String::new());
        assert_eq!(SuitabilityPolicy::profile_field_count(&record), 0);
    }

    #[test]
    fn non_found_outcomes_are_never_suitable() {
        let policy = SuitabilityPolicy::default();
        assert!(!policy.is_suitable(&DetailOutcome::NotFound {
            login: "ghost".into()
        }));
        assert!(!policy.is_suitable(&DetailOutcome::Organization {
            login: "github".into()
        }));
        assert!(!policy.is_suitable(&DetailOutcome::TransportError {
            message: "timeout".into()
        }));
    }

    #[test]
    fn threshold_is_configuration_not_constant() {
        let strict = SuitabilityPolicy {
            min_profile_fields: 5,
        };
        let all = DetailOutcome::Found(record_with(0b11111));
        let four = DetailOutcome::Found(record_with(0b01111));
        assert!(strict.is_suitable(&all));
        assert!(!strict.is_suitable(&four));

        let lax = SuitabilityPolicy {
            min_profile_fields: 0,
        };
        assert!(lax.is_suitable(&DetailOutcome::Found(record_with(0))));
    }
}
