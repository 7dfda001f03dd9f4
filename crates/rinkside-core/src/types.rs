//! Common type definitions and newtypes for Rinkside.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RinksideError};

/// Language code as understood by the translation upstream.
///
/// Codes are stored upper-cased. A code is a 2-3 letter primary
/// subtag, optionally followed by a 2-4 letter region or script
/// (`EN`, `EN-GB`, `PT-BR`, `ZH-HANS`).
///
/// # Example
///
/// ```
/// use rinkside_core::LangCode;
///
/// let lang = LangCode::parse(" en-gb ").unwrap();
/// assert_eq!(lang.as_str(), "EN-GB");
/// assert_eq!(lang.base(), "EN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LangCode(String);

impl LangCode {
    /// Parses and normalizes a language code.
    pub fn parse(code: &str) -> Result<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(RinksideError::invalid_language(code, "code is empty"));
        }

        let mut parts = normalized.splitn(2, '-');
        let primary = parts.next().unwrap_or_default();
        let region = parts.next();

        check_subtag(code, primary, 2..=3)?;
        if let Some(region) = region {
            check_subtag(code, region, 2..=4)?;
        }

        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the primary subtag (`EN-GB` becomes `EN`).
    pub fn base(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

fn check_subtag(original: &str, subtag: &str, len: std::ops::RangeInclusive<usize>) -> Result<()> {
    if let Some(c) = subtag.chars().find(|c| !c.is_ascii_uppercase()) {
        return Err(RinksideError::invalid_language(
            original,
            format!("unexpected character '{}'", c.to_ascii_lowercase()),
        ));
    }
    if !len.contains(&subtag.len()) {
        return Err(RinksideError::invalid_language(
            original,
            format!(
                "subtag '{}' must be {}-{} letters",
                subtag,
                len.start(),
                len.end()
            ),
        ));
    }
    Ok(())
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LangCode {
    type Err = RinksideError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for LangCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
