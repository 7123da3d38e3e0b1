pub mod ai;
pub mod calendar;
pub mod conversation;
pub mod intent;
pub mod scheduling;
pub mod sessions;
pub mod time_extractor;

use std::time::Duration;

use anyhow::Context;

/// HTTP client shared by the outbound providers. Every request is bounded by
/// `timeout`.
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}
