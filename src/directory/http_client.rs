use reqwest::Client;
use std::time::Duration;

/// GitHub rejects requests without a User-Agent outright.
const USER_AGENT: &str = concat!("octoscout/", env!("CARGO_PKG_VERSION"));

pub fn build_directory_client(timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
