//! Servicio de traduccion: cache delante de una llamada upstream single-flight.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use rinkside_core::{Translation, TranslationKey};
use rinkside_deepl::{TranslateError, Translator};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::TranslationCache;
use crate::metrics::CacheMetrics;
use crate::singleflight::{Role, SingleFlight};

/// Origen de una traduccion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Cache,
    Upstream,
    /// Compartida desde la llamada upstream en curso de otro request.
    Coalesced,
}

/// Traduccion junto con la forma en que se obtuvo.
#[derive(Debug, Clone)]
pub struct TranslateOutcome {
    pub translation: Arc<Translation>,
    pub source: ResultSource,
}

impl TranslateOutcome {
    /// Retorna true si no se llamo al upstream para este request.
    pub fn cached(&self) -> bool {
        self.source == ResultSource::Cache
    }
}

/// Contadores expuestos en `GET /api/translate/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub upstream: String,
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub coalesced: u64,
    pub upstream_calls: u64,
    pub upstream_errors: u64,
    pub in_flight: usize,
}

/// Resuelve traducciones via cache, deduplicando llamadas upstream
/// concurrentes para la misma key.
///
/// Solo se cachean los exitos. Un fallo upstream se comparte con los
/// requests que lo esperaban y luego se olvida: el siguiente request para
/// esa key vuelve a intentar contra el upstream.
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    cache: TranslationCache,
    inflight: Arc<SingleFlight<TranslationKey, Fetched, TranslateError>>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, cache: TranslationCache) -> Self {
        Self {
            translator,
            cache,
            inflight: Arc::new(SingleFlight::new()),
        }
    }

    /// Traduce una key.
    pub async fn translate(&self, key: TranslationKey) -> Result<TranslateOutcome, TranslateError> {
        if let Some(translation) = self.cache.get(&key).await {
            debug!(key = %key, "Translation served from cache");
            return Ok(TranslateOutcome {
                translation,
                source: ResultSource::Cache,
            });
        }

        self.resolve(key).await
    }

    /// Camino tras un miss: une al request al vuelo existente o lo lidera.
    async fn resolve(&self, key: TranslationKey) -> Result<TranslateOutcome, TranslateError> {
        let (result, role) = self
            .inflight
            .run(key.clone(), || self.fetch(&key))
            .await;

        let fetched = result?;
        let source = match role {
            Role::Leader if fetched.from_cache => ResultSource::Cache,
            Role::Leader => ResultSource::Upstream,
            Role::Follower => {
                self.metrics().record_coalesced();
                ResultSource::Coalesced
            },
        };

        Ok(TranslateOutcome {
            translation: fetched.translation,
            source,
        })
    }

    /// Traduce varias keys en paralelo, preservando el orden.
    ///
    /// Falla con el primer error segun el orden de entrada; las traducciones
    /// exitosas quedan cacheadas igual.
    pub async fn translate_batch(
        &self,
        keys: Vec<TranslationKey>,
    ) -> Result<Vec<TranslateOutcome>, TranslateError> {
        join_all(keys.into_iter().map(|key| self.translate(key)))
            .await
            .into_iter()
            .collect()
    }

    /// Se ejecuta como lider del single-flight.
    async fn fetch(&self, key: &TranslationKey) -> Result<Fetched, TranslateError> {
        // Un lider anterior pudo llenar la cache entre nuestro miss y la eleccion
        if let Some(translation) = self.cache.peek(key).await {
            debug!(key = %key, "Translation found in cache after election");
            return Ok(Fetched {
                translation,
                from_cache: true,
            });
        }

        let start = Instant::now();
        let result = self.translator.translate(key).await;
        let elapsed = start.elapsed();

        match result {
            Ok(translation) => {
                self.metrics().record_upstream(elapsed, None);
                debug!(
                    key = %key,
                    upstream = self.translator.name(),
                    duration_ms = elapsed.as_millis() as u64,
                    "Translation fetched from upstream"
                );

                let translation = Arc::new(translation);
                self.cache.insert(key.clone(), Arc::clone(&translation)).await;
                Ok(Fetched {
                    translation,
                    from_cache: false,
                })
            },
            Err(err) => {
                self.metrics().record_upstream(elapsed, Some(failure_reason(&err)));
                warn!(
                    key = %key,
                    upstream = self.translator.name(),
                    error = %err,
                    "Upstream translation failed"
                );
                Err(err)
            },
        }
    }

    /// Verifica que el upstream responda.
    pub async fn upstream_health(&self) -> Result<(), TranslateError> {
        self.translator.health_check().await
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    fn metrics(&self) -> &CacheMetrics {
        self.cache.metrics()
    }

    /// Retorna un snapshot de los contadores del servicio.
    pub async fn stats(&self) -> ServiceStats {
        self.cache.sync().await;
        let metrics = self.metrics();

        ServiceStats {
            upstream: self.translator.name().to_string(),
            entries: self.cache.entry_count(),
            hits: metrics.hits(),
            misses: metrics.misses(),
            hit_rate: metrics.hit_rate(),
            coalesced: metrics.coalesced(),
            upstream_calls: metrics.upstream_calls(),
            upstream_errors: metrics.upstream_errors(),
            in_flight: self.inflight.in_flight(),
        }
    }
}

/// Resultado compartido por un vuelo single-flight.
#[derive(Debug, Clone)]
struct Fetched {
    translation: Arc<Translation>,
    from_cache: bool,
}

fn failure_reason(err: &TranslateError) -> String {
    match err {
        TranslateError::Upstream { status, .. } => status.to_string(),
        TranslateError::Transport { timeout: true, .. } => "timeout".to_string(),
        TranslateError::Transport { .. } => "transport".to_string(),
        TranslateError::InvalidResponse(_) => "invalid_response".to_string(),
        TranslateError::NotConfigured => "not_configured".to_string(),
        TranslateError::InvalidConfig(_) => "invalid_config".to_string(),
    }
}
