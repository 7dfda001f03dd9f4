//! DeepL client configuration.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::retry::RetryPolicy;

/// Base URL of the DeepL Free API.
pub const FREE_BASE_URL: &str = "https://api-free.deepl.com";

/// Base URL of the DeepL Pro API.
pub const PRO_BASE_URL: &str = "https://api.deepl.com";

/// Suffix DeepL appends to Free plan authentication keys.
const FREE_KEY_SUFFIX: &str = ":fx";

/// DeepL subscription plan, which decides the API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepLPlan {
    Free,
    Pro,
}

impl DeepLPlan {
    /// Guesses the plan from the key format.
    pub fn for_key(api_key: &str) -> Self {
        if api_key.trim().ends_with(FREE_KEY_SUFFIX) {
            Self::Free
        } else {
            Self::Pro
        }
    }

    /// Returns the API base URL for this plan.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Free => FREE_BASE_URL,
            Self::Pro => PRO_BASE_URL,
        }
    }

    /// Returns the other plan.
    pub fn other(&self) -> Self {
        match self {
            Self::Free => Self::Pro,
            Self::Pro => Self::Free,
        }
    }
}

impl fmt::Display for DeepLPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

/// How the endpoint is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Pick from the key suffix and switch once on a "wrong endpoint" answer.
    #[default]
    Auto,
    /// Always use the Free API.
    Free,
    /// Always use the Pro API.
    Pro,
}

impl EndpointMode {
    /// Parses a mode name (`auto`, `free`, `pro`).
    pub fn parse(value: &str) -> Result<Self, TranslateError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(TranslateError::InvalidConfig(format!(
                "unknown DeepL endpoint '{}', expected auto, free or pro",
                other
            ))),
        }
    }
}

/// Configuration for [`DeepLClient`](crate::DeepLClient).
#[derive(Clone)]
pub struct DeepLConfig {
    api_key: String,
    endpoint: EndpointMode,
    free_url: String,
    pro_url: String,
    timeout: Duration,
    retry: RetryPolicy,
    requests_per_second: Option<NonZeroU32>,
}

impl DeepLConfig {
    /// Creates a new builder for DeepLConfig.
    pub fn builder() -> DeepLConfigBuilder {
        DeepLConfigBuilder::default()
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the endpoint selection mode.
    pub fn endpoint(&self) -> EndpointMode {
        self.endpoint
    }

    /// Returns the base URL used for `plan`.
    pub fn url_for(&self, plan: DeepLPlan) -> &str {
        match plan {
            DeepLPlan::Free => &self.free_url,
            DeepLPlan::Pro => &self.pro_url,
        }
    }

    /// Returns true if a "wrong endpoint" answer may switch plans.
    pub fn can_switch_plan(&self) -> bool {
        self.endpoint == EndpointMode::Auto && self.free_url != self.pro_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns the throttle rate, `None` when unthrottled.
    pub fn requests_per_second(&self) -> Option<NonZeroU32> {
        self.requests_per_second
    }

    /// Returns the plan to start with.
    pub fn initial_plan(&self) -> DeepLPlan {
        match self.endpoint {
            EndpointMode::Auto => DeepLPlan::for_key(&self.api_key),
            EndpointMode::Free => DeepLPlan::Free,
            EndpointMode::Pro => DeepLPlan::Pro,
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for DeepLConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("free_url", &self.free_url)
            .field("pro_url", &self.pro_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

/// Builder for DeepLConfig.
#[derive(Default)]
pub struct DeepLConfigBuilder {
    api_key: Option<String>,
    endpoint: EndpointMode,
    free_url: Option<String>,
    pro_url: Option<String>,
    timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    requests_per_second: Option<u32>,
}

impl DeepLConfigBuilder {
    /// Sets the authentication key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the endpoint selection mode.
    pub fn endpoint(mut self, mode: EndpointMode) -> Self {
        self.endpoint = mode;
        self
    }

    /// Sends every request to `url` regardless of plan (self-hosted proxies).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.free_url = Some(url.clone());
        self.pro_url = Some(url);
        self
    }

    /// Overrides the per-plan base URLs.
    pub fn plan_urls(mut self, free: impl Into<String>, pro: impl Into<String>) -> Self {
        self.free_url = Some(free.into());
        self.pro_url = Some(pro.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Throttles upstream calls; `0` disables throttling.
    pub fn requests_per_second(mut self, rate: u32) -> Self {
        self.requests_per_second = Some(rate);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if no API key was given
    /// - `InvalidConfig` if the base URL is not http(s)
    pub fn build(self) -> Result<DeepLConfig, TranslateError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(TranslateError::NotConfigured)?;

        let free_url = check_url(self.free_url.as_deref().unwrap_or(DeepLPlan::Free.base_url()))?;
        let pro_url = check_url(self.pro_url.as_deref().unwrap_or(DeepLPlan::Pro.base_url()))?;

        Ok(DeepLConfig {
            api_key,
            endpoint: self.endpoint,
            free_url,
            pro_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(15)),
            retry: self.retry.unwrap_or_default(),
            requests_per_second: self.requests_per_second.and_then(NonZeroU32::new),
        })
    }
}

fn check_url(url: &str) -> Result<String, TranslateError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(TranslateError::InvalidConfig(format!(
            "base URL '{}' must start with http:// or https://",
            url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}
