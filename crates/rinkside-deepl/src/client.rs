//! DeepL REST client.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use rinkside_core::{LangCode, Translation, TranslationKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::{DeepLConfig, DeepLPlan};
use crate::error::TranslateError;
use crate::retry::parse_retry_after;
use crate::throttle::Throttle;
use crate::translator::Translator;

const TRANSLATE_PATH: &str = "/v2/translate";
const USAGE_PATH: &str = "/v2/usage";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

/// Client for the DeepL translation API.
///
/// Picks the free or pro host from the configuration, retries 429/5xx
/// answers according to the retry policy and optionally throttles
/// outgoing requests.
pub struct DeepLClient {
    http: reqwest::Client,
    config: DeepLConfig,
    plan: RwLock<DeepLPlan>,
    throttle: Option<Throttle>,
}

impl DeepLClient {
    /// Creates a client from the given configuration.
    pub fn new(config: DeepLConfig) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslateError::InvalidConfig(e.to_string()))?;

        let throttle = config.requests_per_second().map(Throttle::per_second);
        let plan = config.initial_plan();

        debug!(plan = %plan, throttled = throttle.is_some(), "DeepL client created");

        Ok(Self {
            http,
            plan: RwLock::new(plan),
            config,
            throttle,
        })
    }

    /// Returns the plan currently used.
    pub fn plan(&self) -> DeepLPlan {
        *self.plan.read()
    }

    fn url(&self, plan: DeepLPlan, path: &str) -> String {
        format!("{}{}", self.config.url_for(plan), path)
    }

    /// Sends a request built by `build`, applying throttling, retries and
    /// the one-time plan switch on a "wrong endpoint" answer.
    async fn execute<F>(&self, path: &str, build: F) -> Result<reqwest::Response, TranslateError>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let retry = self.config.retry();
        let mut attempt = 0;
        let mut switched = false;

        loop {
            if let Some(throttle) = &self.throttle {
                throttle.acquire().await;
            }

            let used = self.plan();
            let url = self.url(used, path);
            let response = build(&url)
                .header(
                    AUTHORIZATION,
                    format!("DeepL-Auth-Key {}", self.config.api_key()),
                )
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_default();
            let err = TranslateError::upstream(status.as_u16(), &body);

            if status.as_u16() == 403
                && !switched
                && self.config.can_switch_plan()
                && is_wrong_endpoint(&body)
            {
                // Another request may already have switched away from `used`
                if self.switch_plan_from(used) {
                    warn!(plan = %used.other(), "DeepL rejected endpoint for this key, switching plan");
                }
                switched = true;
                continue;
            }

            if retry.should_retry(attempt, &err) {
                let delay = retry.delay_for(retry_after);
                warn!(
                    status = status.as_u16(),
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "DeepL request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(err);
        }
    }

    /// Moves off `used` if it is still current. Returns whether this call switched.
    fn switch_plan_from(&self, used: DeepLPlan) -> bool {
        let mut plan = self.plan.write();
        if *plan != used {
            return false;
        }
        *plan = used.other();
        true
    }
}

fn is_wrong_endpoint(body: &str) -> bool {
    body.to_ascii_lowercase().contains("wrong endpoint")
}

#[async_trait]
impl Translator for DeepLClient {
    #[instrument(skip_all, fields(key = %key))]
    async fn translate(&self, key: &TranslationKey) -> Result<Translation, TranslateError> {
        let body = TranslateBody {
            text: [key.text()],
            target_lang: key.target().as_str(),
            source_lang: key.source().map(LangCode::as_str),
        };

        let response = self
            .execute(TRANSLATE_PATH, |url| self.http.post(url).json(&body))
            .await?;

        let parsed: TranslateResponse = response.json().await?;
        let first = parsed
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::InvalidResponse("no translations returned".into()))?;

        // An unknown detected language is not worth failing the request for.
        let detected = first
            .detected_source_language
            .as_deref()
            .and_then(|code| LangCode::parse(code).ok());

        debug!(chars = first.text.chars().count(), "DeepL translation received");

        Ok(Translation::new(first.text, detected))
    }

    async fn health_check(&self) -> Result<(), TranslateError> {
        self.execute(USAGE_PATH, |url| self.http.get(url))
            .await
            .map(|_| ())
    }

    fn name(&self) -> &str {
        "deepl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_endpoint_detection() {
        assert!(is_wrong_endpoint(
            r#"{"message":"Wrong endpoint. Use https://api.deepl.com"}"#
        ));
        assert!(!is_wrong_endpoint(r#"{"message":"Authorization failure"}"#));
    }

    #[test]
    fn test_body_serialization() {
        let body = TranslateBody {
            text: ["Hello"],
            target_lang: "DE",
            source_lang: None,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["text"][0], "Hello");
        assert_eq!(json["target_lang"], "DE");
        assert!(json.get("source_lang").is_none());
    }

    #[test]
    fn test_client_starts_on_key_plan() {
        let config = DeepLConfig::builder().api_key("abc:fx").build().unwrap();
        let client = DeepLClient::new(config).unwrap();

        assert_eq!(client.plan(), DeepLPlan::Free);
        assert_eq!(
            client.url(client.plan(), TRANSLATE_PATH),
            "https://api-free.deepl.com/v2/translate"
        );
    }

    #[test]
    fn test_switch_plan_flips() {
        let config = DeepLConfig::builder().api_key("abc").build().unwrap();
        let client = DeepLClient::new(config).unwrap();

        assert_eq!(client.plan(), DeepLPlan::Pro);
        assert!(client.switch_plan_from(DeepLPlan::Pro));
        assert_eq!(client.plan(), DeepLPlan::Free);
    }

    #[test]
    fn test_stale_switch_keeps_current_plan() {
        let config = DeepLConfig::builder().api_key("abc:fx").build().unwrap();
        let client = DeepLClient::new(config).unwrap();

        // Two requests sent on Free both see "wrong endpoint"
        assert!(client.switch_plan_from(DeepLPlan::Free));
        assert!(!client.switch_plan_from(DeepLPlan::Free));

        assert_eq!(client.plan(), DeepLPlan::Pro);
    }
}
