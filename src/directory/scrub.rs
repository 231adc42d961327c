use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

/// Markers whose trailing token gets redacted. GitHub personal access
/// tokens are self-identifying prefixes; the rest are header/query forms
/// a proxy or misconfigured client can echo back in an error body.
const SECRET_MARKERS: [&str; 9] = [
    "ghp_",
    "github_pat_",
    "gho_",
    "ghs_",
    "Authorization: token ",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "access_token=",
    "\"token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn redact_after(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = content_start
            + scrubbed[content_start..]
                .find(|c| !is_secret_char(c))
                .unwrap_or(scrubbed.len() - content_start);

        // Bare marker with no token value after it.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, "[REDACTED]");
        search_from = start + "[REDACTED]".len();
    }
}

/// Scrub token-like substrings from directory error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS.iter().any(|m| input.contains(m)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        redact_after(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_classic_token_prefix() {
        let out = scrub_secret_patterns("bad credentials for ghp_abcDEF1234567890");
        assert_eq!(out, "bad credentials for [REDACTED]");
    }

    #[test]
    fn redacts_fine_grained_token_prefix() {
        let out = scrub_secret_patterns("token github_pat_11AAA_bbb rejected");
        assert_eq!(out, "token [REDACTED] rejected");
    }

    #[test]
    fn redacts_auth_header_value() {
        let out = scrub_secret_patterns("sent Authorization: token deadbeef and failed");
        assert!(!out.contains("deadbeef"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn redacts_every_occurrence() {
        let out = scrub_secret_patterns("ghp_one then ghp_two");
        assert_eq!(out, "[REDACTED] then [REDACTED]");
    }

    #[test]
    fn leaves_clean_text_unallocated() {
        let input = "404 not found";
        assert!(matches!(scrub_secret_patterns(input), Cow::Borrowed(_)));
    }

    #[test]
    fn bare_marker_without_value_is_kept() {
        let out = scrub_secret_patterns("query had access_token= and nothing else");
        assert_eq!(out, "query had access_token= and nothing else");
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_api_error(&body);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= MAX_API_ERROR_CHARS + 3);
    }

    #[test]
    fn sanitize_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        let out = sanitize_api_error(&body);
        assert!(out.ends_with("..."));
    }
}
