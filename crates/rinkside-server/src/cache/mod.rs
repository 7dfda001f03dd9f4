//! Modulo de cache del proxy de traduccion.
//!
//! Cache de traducciones sobre Moka: capacidad acotada con eviction LRU,
//! expiracion por TTL e invalidacion masiva con metricas.

pub mod invalidation;
pub mod translation_cache;

// Re-exportaciones
pub use invalidation::InvalidationResult;
pub use translation_cache::{CacheConfig, TranslationCache};
