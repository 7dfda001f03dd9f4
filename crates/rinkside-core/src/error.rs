//! Error types for Rinkside domain validation.
//!
//! Every fallible constructor in this crate returns
//! `Result<T, RinksideError>`. The server maps these errors
//! to `400 Bad Request` responses.
//!
//! # Example
//!
//! ```
//! use rinkside_core::{LangCode, RinksideError};
//!
//! let err = LangCode::parse("english").unwrap_err();
//! assert!(matches!(err, RinksideError::InvalidLanguage { .. }));
//! ```

use thiserror::Error;

/// Main error type for Rinkside domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RinksideError {
    /// A translation request failed validation.
    #[error("Invalid translation request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected
        reason: String,
    },

    /// A language code could not be parsed.
    #[error("Invalid language code '{code}': {reason}")]
    InvalidLanguage {
        /// The code as provided by the caller
        code: String,
        /// Why it's invalid
        reason: String,
    },
}

impl RinksideError {
    /// Creates an invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates an invalid language error.
    pub fn invalid_language(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLanguage {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for Rinkside domain operations.
pub type Result<T> = std::result::Result<T, RinksideError>;
