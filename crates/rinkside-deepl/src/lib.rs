//! # Rinkside DeepL upstream
//!
//! Translation upstream for the Rinkside proxy.
//!
//! ## Features
//!
//! - Async `Translator` trait so the proxy can be tested without network access
//! - Free/pro endpoint selection from the key suffix, with a one-time switch
//!   when DeepL reports the wrong endpoint
//! - Fixed-delay retry of 429 and 5xx answers
//! - Optional client-side throttling of outgoing requests
//!
//! ## Example
//!
//! ```ignore
//! use rinkside_deepl::{DeepLClient, DeepLConfig, Translator};
//!
//! let config = DeepLConfig::builder()
//!     .api_key(std::env::var("DEEPL_API_KEY")?)
//!     .requests_per_second(5)
//!     .build()?;
//!
//! let client = DeepLClient::new(config)?;
//! let translation = client.translate(&key).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod throttle;
pub mod translator;

// Re-exports
pub use client::DeepLClient;
pub use config::{DeepLConfig, DeepLConfigBuilder, DeepLPlan, EndpointMode};
pub use error::TranslateError;
pub use retry::RetryPolicy;
pub use throttle::Throttle;
pub use translator::{Translator, Unconfigured};

// Re-export rinkside_core for consumers
pub use rinkside_core;
