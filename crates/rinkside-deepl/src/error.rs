//! Error types for translation upstreams.

/// Errors that can occur when calling a translation upstream.
///
/// The type is `Clone` because a single upstream result is shared with
/// every caller waiting on the same in-flight translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never got a response (connect error, timeout, ...).
    #[error("transport error: {message}")]
    Transport { message: String, timeout: bool },

    /// The upstream answered 2xx with a body we could not use.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    /// No API key is configured.
    #[error("translation upstream is not configured")]
    NotConfigured,

    /// The client configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Upstream error bodies are truncated to this many characters.
const MAX_MESSAGE_CHARS: usize = 200;

impl TranslateError {
    /// Creates an upstream error, extracting `message` from a DeepL JSON body when present.
    pub fn upstream(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| body.trim().to_string());

        Self::Upstream {
            status,
            message: message.chars().take(MAX_MESSAGE_CHARS).collect(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>, timeout: bool) -> Self {
        Self::Transport {
            message: message.into(),
            timeout,
        }
    }

    /// Returns true for upstream answers worth retrying: 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { status, .. } if *status == 429 || (500..=599).contains(status))
    }

    /// Returns the upstream HTTP status, if the upstream answered.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// HTTP status the proxy should answer with for this error.
    ///
    /// Rate limiting is passed through so the front-end can back off;
    /// DeepL's quota exhaustion (456) and missing configuration are
    /// reported as unavailability; everything else is a bad gateway.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Upstream { status: 429, .. } => 429,
            Self::Upstream { status: 456, .. } => 503,
            Self::Upstream { .. } => 502,
            Self::Transport { timeout: true, .. } => 504,
            Self::Transport { .. } => 502,
            Self::InvalidResponse(_) => 502,
            Self::NotConfigured => 503,
            Self::InvalidConfig(_) => 500,
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        Self::transport(err.to_string(), err.is_timeout())
    }
}
