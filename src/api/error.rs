/// Failures returned by a [`CatalogClient`](super::CatalogClient) call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("HTTP {status}{}: {message}", reason_suffix(.reason))]
    Status {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON for {resource}: {source}")]
    Json {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn status(status: u16, reason: Option<&str>, message: &str) -> Self {
        ApiError::Status {
            status,
            reason: reason.map(str::to_string),
            message: message.to_string(),
        }
    }

    fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Json { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Quota,
    NotFound,
    Forbidden,
    Other,
}

/// Sorts an API failure into the buckets the pipeline reacts to.
///
/// Quota exhaustion is only recognisable from the error text (the API reports
/// it as a 403 with a `quotaExceeded` reason), so this matches on wording and
/// will misfire if the API rephrases its messages.
pub fn classify_error(err: &ApiError) -> ErrorKind {
    let text = err.to_string().to_lowercase();
    let status = err.http_status();
    if text.contains("quota") {
        ErrorKind::Quota
    } else if text.contains("notfound") || status == Some(404) {
        ErrorKind::NotFound
    } else if text.contains("forbidden") || status == Some(403) {
        ErrorKind::Forbidden
    } else {
        ErrorKind::Other
    }
}
