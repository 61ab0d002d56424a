use std::io::{self, BufRead};

use anyhow::{Context, bail};
use tracing::info;

use crate::api::{ErrorKind, Privacy, classify_error};
use crate::config::Config;
use crate::playlist::{append, resolve_or_create};

/// Video ids, one per line, up to the first blank line or end of input.
fn read_ids(input: impl BufRead) -> anyhow::Result<Vec<String>> {
    let mut ids = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read video ids")?;
        let id = line.trim();
        if id.is_empty() {
            break;
        }
        ids.push(id.to_string());
    }
    Ok(ids)
}

pub(crate) fn cmd_add(
    config: &Config,
    playlist_name: &str,
    privacy: Privacy,
    ids: Vec<String>,
) -> anyhow::Result<()> {
    let ids = if ids.is_empty() {
        eprintln!("Enter YouTube video IDs, one per line; an empty line finishes.");
        eprintln!("Example: in https://www.youtube.com/watch?v=dQw4w9WgXcQ the ID is dQw4w9WgXcQ");
        read_ids(io::stdin().lock())?
    } else {
        ids
    };
    if ids.is_empty() {
        info!("No videos were added.");
        return Ok(());
    }

    let client = super::catalog_client(config)?;
    let playlist_id = match resolve_or_create(&client, playlist_name, privacy) {
        Ok(id) => id,
        Err(err) if classify_error(&err) == ErrorKind::Quota => {
            bail!("YouTube API quota is exhausted; try again after it resets: {err}")
        }
        Err(err) => return Err(err).context("failed to get or create playlist"),
    };

    let summary = append(&client, &ids, &playlist_id, config.insert_delay);
    if summary.quota_exhausted {
        bail!(
            "YouTube API quota ran out after adding {} videos",
            summary.added
        );
    }
    Ok(())
}
