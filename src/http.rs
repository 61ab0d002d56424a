use std::time::Duration;

use anyhow::Context;

/// Requests that take longer than this fail and are handled like any other
/// API error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn user_agent() -> String {
    format!("subwatch/{}", env!("CARGO_PKG_VERSION"))
}

/// Shared blocking client for every YouTube Data API request.
pub(crate) fn http_client(timeout: Duration) -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}
