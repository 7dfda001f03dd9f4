//! # Rinkside Server
//!
//! Backend HTTP de la app de gestion de equipos Rinkside.
//!
//! Dos superficies comparten un router axum:
//!
//! - `/api/translate`: proxy a DeepL con cache LRU/TTL y deduplicacion
//!   single-flight de requests identicos concurrentes
//! - `/api/db`: fachada REST estilo json-server sobre un documento JSON plano
//!
//! Ademas `/health`, `/health/upstream` y un endpoint Prometheus `/metrics`.

pub mod cache;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod singleflight;
pub mod state;
pub mod translate;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{cors_layer, create_router, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;
pub use translate::{ResultSource, TranslateOutcome, TranslationService};

/// Retorna la version del crate.
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
}
