//! Modulo de metricas del servidor Rinkside.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::init_metrics;
