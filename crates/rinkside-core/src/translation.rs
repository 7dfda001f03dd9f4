//! Translation requests, keys and results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RinksideError};
use crate::types::LangCode;

/// Maximum number of characters accepted in a single text.
pub const MAX_TEXT_CHARS: usize = 5_000;

/// Identity of a translation: what is translated, from where, to where.
///
/// Used both as cache key and single-flight key. The text is kept
/// verbatim since whitespace and casing change the translation. A key
/// without a source language (auto-detect) never equals a key with
/// an explicit source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    text: String,
    source: Option<LangCode>,
    target: LangCode,
}

impl TranslationKey {
    /// Creates a key from already validated parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rinkside_core::{LangCode, TranslationKey};
    ///
    /// let key = TranslationKey::new(
    ///     "Practice moved to 6pm",
    ///     None,
    ///     LangCode::parse("fr").unwrap(),
    /// );
    /// assert_eq!(key.target().as_str(), "FR");
    /// assert!(key.source().is_none());
    /// ```
    pub fn new(text: impl Into<String>, source: Option<LangCode>, target: LangCode) -> Self {
        Self {
            text: text.into(),
            source,
            target,
        }
    }

    /// Returns the text to translate.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source language, `None` for auto-detection.
    pub fn source(&self) -> Option<&LangCode> {
        self.source.as_ref()
    }

    /// Returns the target language.
    pub fn target(&self) -> &LangCode {
        &self.target
    }
}

impl fmt::Display for TranslationKey {
    // Never prints the text itself; keys end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source.as_ref().map(LangCode::as_str).unwrap_or("auto");
        write!(
            f,
            "{}->{}[{} chars]",
            source,
            self.target,
            self.text.chars().count()
        )
    }
}

/// Translation request as sent by the front-end.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate.
    pub text: String,

    /// Source language; absent or blank means auto-detect.
    #[serde(default)]
    pub source_lang: Option<String>,

    /// Target language.
    pub target_lang: String,
}

impl TranslationRequest {
    /// Validates the request and builds its key.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the text is blank or too long
    /// - `InvalidLanguage` if either language code is malformed
    pub fn validate(&self) -> Result<TranslationKey> {
        validate_text(&self.text)?;
        let (source, target) = parse_langs(self.source_lang.as_deref(), &self.target_lang)?;
        Ok(TranslationKey::new(self.text.clone(), source, target))
    }
}

/// Batch translation request: several texts sharing one language pair.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchTranslationRequest {
    /// Texts to translate, order is preserved in the response.
    pub texts: Vec<String>,

    /// Source language; absent or blank means auto-detect.
    #[serde(default)]
    pub source_lang: Option<String>,

    /// Target language.
    pub target_lang: String,
}

impl BatchTranslationRequest {
    /// Maximum number of texts in one batch.
    pub const MAX_TEXTS: usize = 50;

    /// Validates every text and builds one key per text.
    pub fn validate(&self) -> Result<Vec<TranslationKey>> {
        if self.texts.is_empty() {
            return Err(RinksideError::invalid_request("texts is empty"));
        }
        if self.texts.len() > Self::MAX_TEXTS {
            return Err(RinksideError::invalid_request(format!(
                "at most {} texts per batch",
                Self::MAX_TEXTS
            )));
        }

        let (source, target) = parse_langs(self.source_lang.as_deref(), &self.target_lang)?;
        self.texts
            .iter()
            .map(|text| {
                validate_text(text)?;
                Ok(TranslationKey::new(text.clone(), source.clone(), target.clone()))
            })
            .collect()
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RinksideError::invalid_request("text is empty"));
    }
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(RinksideError::invalid_request(format!(
            "text has {} characters, limit is {}",
            chars, MAX_TEXT_CHARS
        )));
    }
    Ok(())
}

fn parse_langs(source: Option<&str>, target: &str) -> Result<(Option<LangCode>, LangCode)> {
    let source = match source.map(str::trim) {
        Some(code) if !code.is_empty() => Some(LangCode::parse(code)?),
        _ => None,
    };
    let target = LangCode::parse(target)?;
    Ok((source, target))
}

/// A translated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// The translated text.
    pub text: String,

    /// Language detected (or confirmed) by the upstream.
    pub detected_source_lang: Option<LangCode>,
}

impl Translation {
    /// Creates a translation result.
    pub fn new(text: impl Into<String>, detected_source_lang: Option<LangCode>) -> Self {
        Self {
            text: text.into(),
            detected_source_lang,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, source: Option<&str>, target: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            source_lang: source.map(String::from),
            target_lang: target.to_string(),
        }
    }

    #[test]
    fn test_validate_builds_normalized_key() {
        let key = request("Game day!", Some("en"), "de").validate().unwrap();
        assert_eq!(key.text(), "Game day!");
        assert_eq!(key.source().unwrap().as_str(), "EN");
        assert_eq!(key.target().as_str(), "DE");
    }

    #[test]
    fn test_blank_source_means_auto() {
        let key = request("Game day!", Some("  "), "de").validate().unwrap();
        assert!(key.source().is_none());
    }

    #[test]
    fn test_rejects_blank_text() {
        let err = request("   ", None, "de").validate().unwrap_err();
        assert!(matches!(err, RinksideError::InvalidRequest { .. }));
    }

    #[test]
    fn test_rejects_oversized_text() {
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        assert!(request(&text, None, "de").validate().is_err());

        let text = "a".repeat(MAX_TEXT_CHARS);
        assert!(request(&text, None, "de").validate().is_ok());
    }

    #[test]
    fn test_auto_and_explicit_source_are_distinct_keys() {
        let auto = request("Hi", None, "de").validate().unwrap();
        let explicit = request("Hi", Some("en"), "de").validate().unwrap();
        assert_ne!(auto, explicit);
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let a = request("Hi", None, "de").validate().unwrap();
        let b = request("Hi ", None, "de").validate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_display_hides_text() {
        let key = request("secret roster", Some("en"), "fr").validate().unwrap();
        assert_eq!(key.to_string(), "EN->FR[13 chars]");

        let key = request("hi", None, "fr").validate().unwrap();
        assert_eq!(key.to_string(), "auto->FR[2 chars]");
    }

    #[test]
    fn test_batch_limits() {
        let batch = BatchTranslationRequest {
            texts: vec![],
            source_lang: None,
            target_lang: "de".to_string(),
        };
        assert!(batch.validate().is_err());

        let batch = BatchTranslationRequest {
            texts: vec!["x".to_string(); BatchTranslationRequest::MAX_TEXTS + 1],
            source_lang: None,
            target_lang: "de".to_string(),
        };
        assert!(batch.validate().is_err());

        let batch = BatchTranslationRequest {
            texts: vec!["one".to_string(), "two".to_string()],
            source_lang: Some("en".to_string()),
            target_lang: "de".to_string(),
        };
        let keys = batch.validate().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].text(), "two");
    }
}
