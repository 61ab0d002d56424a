use anyhow::bail;

use crate::config::Config;
use crate::quota::{QuotaStatus, check_quota};

pub(crate) fn cmd_quota(config: &Config) -> anyhow::Result<()> {
    let client = super::catalog_client(config)?;
    match check_quota(&client) {
        QuotaStatus::Available => Ok(()),
        QuotaStatus::Exhausted => bail!("YouTube API quota is exhausted"),
    }
}
