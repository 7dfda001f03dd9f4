//! Translation upstream trait definition.

use async_trait::async_trait;
use rinkside_core::{Translation, TranslationKey};

use crate::error::TranslateError;

/// A source of translations.
///
/// This trait abstracts the upstream service so the proxy's caching and
/// request coalescing can be exercised without network access.
///
/// # Implementors
///
/// - `DeepLClient` - DeepL REST API (free or pro)
/// - `Unconfigured` - placeholder used when no API key is set
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates the text identified by `key`.
    ///
    /// # Errors
    ///
    /// - `TranslateError::Upstream` if the upstream answered with an error status
    /// - `TranslateError::Transport` if the upstream could not be reached
    async fn translate(&self, key: &TranslationKey) -> Result<Translation, TranslateError>;

    /// Verifies that the upstream is reachable and the credentials work.
    async fn health_check(&self) -> Result<(), TranslateError>;

    /// Returns the name of this upstream, for logging.
    fn name(&self) -> &str;
}

/// Upstream used when no API key is configured; every call fails with `NotConfigured`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

#[async_trait]
impl Translator for Unconfigured {
    async fn translate(&self, _key: &TranslationKey) -> Result<Translation, TranslateError> {
        Err(TranslateError::NotConfigured)
    }

    async fn health_check(&self) -> Result<(), TranslateError> {
        Err(TranslateError::NotConfigured)
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinkside_core::LangCode;

    struct EchoTranslator;

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, key: &TranslationKey) -> Result<Translation, TranslateError> {
            Ok(Translation::new(
                format!("[{}] {}", key.target(), key.text()),
                key.source().cloned(),
            ))
        }

        async fn health_check(&self) -> Result<(), TranslateError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn key() -> TranslationKey {
        TranslationKey::new("Hello", None, LangCode::parse("de").unwrap())
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let translator: Box<dyn Translator> = Box::new(EchoTranslator);

        let result = translator.translate(&key()).await.unwrap();
        assert_eq!(result.text, "[DE] Hello");
        assert!(translator.health_check().await.is_ok());
        assert_eq!(translator.name(), "echo");
    }

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        let translator = Unconfigured;

        assert_eq!(
            translator.translate(&key()).await,
            Err(TranslateError::NotConfigured)
        );
        assert!(translator.health_check().await.is_err());
    }
}
