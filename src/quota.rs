use tracing::{debug, info, warn};

use crate::api::{CatalogClient, ErrorKind, classify_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    Available,
    Exhausted,
}

/// Probes the API with its cheapest call. Errors other than quota exhaustion
/// are logged and treated as "available" so the run can still try.
pub fn check_quota(client: &impl CatalogClient) -> QuotaStatus {
    match client.list_own_channels() {
        Ok(page) => {
            if let Some(channel) = page.items.first() {
                debug!("Authenticated as channel {}", channel.id);
            }
            info!("YouTube API quota is available.");
            QuotaStatus::Available
        }
        Err(err) if classify_error(&err) == ErrorKind::Quota => {
            warn!("YouTube API quota has been exceeded for today.");
            warn!("The quota resets at midnight Pacific Time.");
            QuotaStatus::Exhausted
        }
        Err(err) => {
            warn!("Error checking quota: {err}");
            QuotaStatus::Available
        }
    }
}
