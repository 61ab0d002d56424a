use tracing::{debug, info};

use crate::api::{ApiError, CatalogClient, pages};

/// Channel ids of every subscription, in the order the API lists them.
pub fn list_subscriptions(client: &impl CatalogClient) -> Result<Vec<String>, ApiError> {
    info!("Fetching your subscriptions...");
    let mut channel_ids = Vec::new();
    for page in pages(|token| client.list_subscriptions(token)) {
        for sub in page? {
            match sub.channel_id() {
                Some(id) => channel_ids.push(id.to_string()),
                None => debug!("Skipping subscription {:?} without a channel id", sub.snippet.title),
            }
        }
    }
    info!("Found {} subscriptions.", channel_ids.len());
    Ok(channel_ids)
}
