pub mod add;
pub mod checkpoint;
pub mod quota;
pub mod run;

use crate::api::youtube::YouTubeClient;
use crate::config::Config;

/// Authenticated API client. Fails before any request when no token is set.
pub(crate) fn catalog_client(config: &Config) -> anyhow::Result<YouTubeClient> {
    let token = config.access_token()?;
    YouTubeClient::new(crate::http::http_client(config.http_timeout)?, &config.api_base, token)
}
