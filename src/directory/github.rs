use super::http_client::build_directory_client;
use super::scrub::sanitize_api_error;
use super::traits::Directory;
use super::types::{CandidateRecord, DetailOutcome, UserStub};
use crate::error::DirectoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const API_VERSION_HEADER: (&str, &str) = ("X-GitHub-Api-Version", "2022-11-28");
const ACCEPT_JSON: (&str, &str) = ("Accept", "application/vnd.github+json");

/// GitHub users directory over the REST API.
///
/// Every request is preceded by a fixed throttle pause; the upstream quota
/// is shared across the whole session, so overlapping or rapid-fire calls
/// would defeat the machine's own pacing.
pub struct GithubDirectory {
    /// Pre-computed auth: `("Authorization", "token <pat>")`, or Bearer for
    /// fine-grained tokens.
    cached_auth: Option<(&'static str, String)>,
    cached_users_url: String,
    base_url: String,
    throttle: Duration,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    /// GitHub reports `"User"` or `"Organization"` here.
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(flatten)]
    record: CandidateRecord,
}

#[derive(Debug, Deserialize)]
struct RateLimitPayload {
    resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
struct RateLimitResources {
    core: RateLimitWindow,
}

/// Remaining core-API quota, as reported by `GET /rate_limit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitWindow {
    pub limit: u64,
    pub remaining: u64,
    pub reset: i64,
}

impl GithubDirectory {
    pub fn new(token: Option<&str>, throttle_ms: u64, timeout_secs: u64) -> Self {
        Self::with_base_url(token, "https://api.github.com", throttle_ms, timeout_secs)
    }

    pub fn with_base_url(
        token: Option<&str>,
        base_url: &str,
        throttle_ms: u64,
        timeout_secs: u64,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let cached_users_url = format!("{base_url}/users");
        let cached_auth = token.map(str::trim).filter(|t| !t.is_empty()).map(|t| {
            if Self::is_fine_grained(t) {
                ("Authorization", format!("Bearer {t}"))
            } else {
                ("Authorization", format!("token {t}"))
            }
        });
        Self {
            cached_auth,
            cached_users_url,
            base_url,
            throttle: Duration::from_millis(throttle_ms),
            client: build_directory_client(timeout_secs),
        }
    }

    fn is_fine_grained(token: &str) -> bool {
        token.starts_with("github_pat_")
    }

    /// Deliberate pause before every upstream call. An explicit suspension
    /// point, not a busy-wait.
    async fn throttle(&self) {
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_JSON.0, ACCEPT_JSON.1)
            .header(API_VERSION_HEADER.0, API_VERSION_HEADER.1);
        if let Some((name, value)) = &self.cached_auth {
            request = request.header(*name, value);
        }
        request
    }

    /// `403`/`429` with an exhausted quota header is the rate-limit signal.
    fn rate_limit_reset(response: &Response) -> Option<DateTime<Utc>> {
        if response.status() != StatusCode::FORBIDDEN
            && response.status() != StatusCode::TOO_MANY_REQUESTS
        {
            return None;
        }
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")?
            .to_str()
            .ok()?;
        if remaining != "0" {
            return None;
        }
        let reset = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());
        Some(
            reset
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .unwrap_or_else(Utc::now),
        )
    }

    async fn failure_message(response: Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read error body>".to_string());
        format!("directory API error ({status}): {}", sanitize_api_error(&body))
    }

    /// Core-API quota snapshot; `GET /rate_limit` does not count against it.
    pub async fn rate_limit_status(&self) -> Result<RateLimitWindow, DirectoryError> {
        let url = format!("{}/rate_limit", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|err| DirectoryError::Request {
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DirectoryError::Request {
                message: Self::failure_message(response).await,
            });
        }

        let payload: RateLimitPayload =
            response
                .json()
                .await
                .map_err(|err| DirectoryError::Decode(err.to_string()))?;
        Ok(payload.resources.core)
    }
}

#[async_trait]
impl Directory for GithubDirectory {
    async fn list_batch(
        &self,
        since_id: u64,
        page_size: u32,
    ) -> Result<Vec<UserStub>, DirectoryError> {
        self.throttle().await;

        let response = self
            .get(&self.cached_users_url)
            .query(&[("since", since_id.to_string()), ("per_page", page_size.to_string())])
            .send()
            .await
            .map_err(|err| DirectoryError::Request {
                message: err.to_string(),
            })?;

        if let Some(reset_at) = Self::rate_limit_reset(&response) {
            return Err(DirectoryError::RateLimited { reset_at });
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(DirectoryError::Auth {
                message: Self::failure_message(response).await,
            });
        }
        if !response.status().is_success() {
            return Err(DirectoryError::Request {
                message: Self::failure_message(response).await,
            });
        }

        let stubs: Vec<UserStub> = response
            .json()
            .await
            .map_err(|err| DirectoryError::Decode(err.to_string()))?;
        tracing::debug!(since_id, count = stubs.len(), "fetched directory batch");
        Ok(stubs)
    }

    async fn fetch_detail(&self, login: &str) -> Result<DetailOutcome, DirectoryError> {
        self.throttle().await;

        let url = format!("{}/{login}", self.cached_users_url);
        let response = match self.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                return Ok(DetailOutcome::TransportError {
                    message: err.to_string(),
                });
            }
        };

        if let Some(reset_at) = Self::rate_limit_reset(&response) {
            return Err(DirectoryError::RateLimited { reset_at });
        }
        if response.status() == StatusCode::NOT_FOUND {
            // Sampled ids routinely point at deleted accounts. Expected,
            // logged quietly, never an error.
            tracing::debug!(login, "directory entry not found");
            return Ok(DetailOutcome::NotFound {
                login: login.to_string(),
            });
        }
        if !response.status().is_success() {
            return Ok(DetailOutcome::TransportError {
                message: Self::failure_message(response).await,
            });
        }

        let payload: DetailPayload = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                return Ok(DetailOutcome::TransportError {
                    message: format!("malformed detail payload: {err}"),
                });
            }
        };

        if payload.kind.as_deref() == Some("Organization") {
            tracing::debug!(login, "skipping organization entity");
            return Ok(DetailOutcome::Organization {
                login: login.to_string(),
            });
        }
        if payload.record.login.is_empty() {
            return Ok(DetailOutcome::TransportError {
                message: format!("detail payload for {login} carried no login"),
            });
        }

        Ok(DetailOutcome::Found(payload.record))
    }
}
