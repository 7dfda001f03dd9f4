//! Cache de traducciones usando Moka.

use crate::metrics::CacheMetrics;
use moka::future::Cache;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use rinkside_core::{Translation, TranslationKey};
use std::sync::Arc;
use std::time::Duration;

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL en segundos (default: 86400 = 24 horas)
    pub ttl_seconds: u64,
    /// Maximo numero de entries (default: 1000)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 86_400,
            max_capacity: 1_000,
        }
    }
}

/// Cache de traducciones usando Moka.
///
/// Politica LRU con capacidad acotada y TTL fijo. Solo se guardan
/// traducciones exitosas; los errores del upstream nunca se cachean.
///
/// # Examples
///
/// ```no_run
/// use rinkside_core::{LangCode, Translation, TranslationKey};
/// use rinkside_server::cache::{CacheConfig, TranslationCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = TranslationCache::new(CacheConfig::default(), Default::default());
/// let key = TranslationKey::new("Hello", None, LangCode::parse("de").unwrap());
///
/// cache.insert(key.clone(), Translation::new("Hallo", None).into()).await;
/// assert!(cache.get(&key).await.is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct TranslationCache {
    inner: Cache<TranslationKey, Arc<Translation>>,
    metrics: CacheMetrics,
}

impl TranslationCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: CacheConfig, metrics: CacheMetrics) -> Self {
        let eviction_metrics = metrics.clone();

        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Obtiene una traduccion del cache si existe y no expiro.
    /// Un hit la marca como usada recientemente.
    pub async fn get(&self, key: &TranslationKey) -> Option<Arc<Translation>> {
        let result = self.inner.get(key).await;

        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }

        result
    }

    /// Consulta el cache sin tocar las metricas de hit/miss.
    pub async fn peek(&self, key: &TranslationKey) -> Option<Arc<Translation>> {
        self.inner.get(key).await
    }

    /// Inserta una traduccion.
    pub async fn insert(&self, key: TranslationKey, value: Arc<Translation>) {
        self.inner.insert(key, value).await;
        self.update_entry_gauge();
    }

    /// Invalida una entrada especifica.
    pub async fn invalidate(&self, key: &TranslationKey) {
        self.inner.invalidate(key).await;
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Itera sobre todas las entries del cache.
    /// Nota: Esta es una snapshot, entries pueden cambiar durante iteracion.
    pub fn iter(&self) -> impl Iterator<Item = (Arc<TranslationKey>, Arc<Translation>)> + '_ {
        self.inner.iter()
    }

    /// Aplica evictions y expiraciones pendientes.
    /// Moka las procesa de forma diferida; llamar antes de leer `entry_count`
    /// cuando se necesita un valor exacto.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
        self.update_entry_gauge();
    }

    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub(crate) fn inner(&self) -> &Cache<TranslationKey, Arc<Translation>> {
        &self.inner
    }
}
