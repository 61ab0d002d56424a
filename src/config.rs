use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

use crate::api::youtube::DEFAULT_API_BASE;
use crate::checkpoint::CheckpointStore;
use crate::http::DEFAULT_TIMEOUT;
use crate::playlist::DEFAULT_INSERT_DELAY;

const HOME_VAR: &str = "SUBWATCH_HOME";
const API_BASE_VAR: &str = "SUBWATCH_API_BASE";
const ACCESS_TOKEN_VAR: &str = "SUBWATCH_ACCESS_TOKEN";
const INSERT_DELAY_VAR: &str = "SUBWATCH_INSERT_DELAY_MS";
const HTTP_TIMEOUT_VAR: &str = "SUBWATCH_HTTP_TIMEOUT_SECS";
const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// State directory: checkpoint, token file and logs.
    pub home: PathBuf,
    pub api_base: String,
    pub access_token: Option<String>,
    pub insert_delay: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let home = lookup(HOME_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_home);

        let api_base = lookup(API_BASE_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let access_token = lookup(ACCESS_TOKEN_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let insert_delay = match lookup(INSERT_DELAY_VAR) {
            Some(raw) => Duration::from_millis(parse_number(INSERT_DELAY_VAR, &raw, "milliseconds")?),
            None => DEFAULT_INSERT_DELAY,
        };

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(raw) => match parse_number(HTTP_TIMEOUT_VAR, &raw, "seconds")? {
                0 => bail!("{HTTP_TIMEOUT_VAR} must be at least 1 second"),
                secs => Duration::from_secs(secs),
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            home,
            api_base,
            access_token,
            insert_delay,
            http_timeout,
        })
    }

    /// The bearer token from the environment, else from `<home>/token`.
    pub fn access_token(&self) -> anyhow::Result<String> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }
        let path = self.home.join(TOKEN_FILE);
        let token = match fs::read_to_string(&path) {
            Ok(raw) => raw.trim().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        if token.is_empty() {
            bail!(
                "no access token: set {ACCESS_TOKEN_VAR} or write one to {}",
                path.display()
            );
        }
        Ok(token)
    }

    pub fn checkpoint_store(&self) -> CheckpointStore {
        CheckpointStore::in_dir(&self.home)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home.join("logs")
    }
}

fn parse_number(var: &str, raw: &str, unit: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{var} must be a number of {unit}, got {raw:?}"))
}

fn default_home() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("subwatch"))
        .unwrap_or_else(|| PathBuf::from("."))
}
