//! Rinkside Core - Domain types
//!
//! This crate provides the foundational types shared by the Rinkside
//! translation proxy and the JSON document façade.

pub mod error;
pub mod translation;
pub mod types;

pub use error::{Result, RinksideError};
pub use translation::{
    BatchTranslationRequest, MAX_TEXT_CHARS, Translation, TranslationKey, TranslationRequest,
};
pub use types::LangCode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
