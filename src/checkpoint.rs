use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use tracing::{debug, warn};

pub const CHECKPOINT_FILE: &str = "last_check_time.txt";

/// How far back the first run (or a run after a lost checkpoint) looks.
const DEFAULT_WINDOW_HOURS: i64 = 24;

/// `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw).or_else(|e| {
        // Some writers append `Z` after an explicit offset: `...+00:00Z`.
        match raw.strip_suffix('Z') {
            Some(stripped) if stripped.contains('+') => DateTime::parse_from_rfc3339(stripped),
            _ => Err(e),
        }
    });
    parsed.ok().map(|t| t.with_timezone(&Utc))
}

/// Persists the instant of the last fully successful run in a one-line file.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CHECKPOINT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted checkpoint, or 24 hours ago when there is none.
    /// Unreadable or corrupt state falls back to the default window.
    pub fn load(&self) -> DateTime<Utc> {
        self.load_at(Utc::now())
    }

    fn load_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let fallback = now.trunc_subsecs(0) - TimeDelta::hours(DEFAULT_WINDOW_HOURS);
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => {
                debug!(path = %self.path.display(), "checkpoint file is empty");
                fallback
            }
            Ok(raw) => parse_timestamp(&raw).unwrap_or_else(|| {
                warn!(
                    "Ignoring unreadable checkpoint {:?} in {}",
                    raw.trim(),
                    self.path.display()
                );
                fallback
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => fallback,
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                fallback
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<DateTime<Utc>> {
        let now = Utc::now().trunc_subsecs(0);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format_timestamp(&now))
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(now)
    }
}
