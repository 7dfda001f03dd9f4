//! Registro de metricas del cache de traducciones y del upstream.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache y upstream.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("rinkside_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("rinkside_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "rinkside_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!("rinkside_cache_entries", "Current number of entries in cache");
    metrics::describe_counter!(
        "rinkside_translate_coalesced_total",
        "Requests served by joining an in-flight upstream call"
    );
    metrics::describe_counter!(
        "rinkside_upstream_requests_total",
        "Translations requested from the upstream"
    );
    metrics::describe_counter!(
        "rinkside_upstream_errors_total",
        "Upstream translations that failed"
    );
    metrics::describe_histogram!(
        "rinkside_upstream_duration_seconds",
        "Time spent waiting for the upstream, retries included"
    );
}

/// Contadores de cache, coalescing y upstream.
/// Usa atomic counters internos para exponerlos en /api/translate/stats.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    coalesced: Arc<AtomicU64>,
    upstream_calls: Arc<AtomicU64>,
    upstream_errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("rinkside_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("rinkside_cache_misses_total").increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        counter!("rinkside_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("rinkside_cache_entries").set(count as f64);
    }

    /// Registra un request que se unio a una llamada en curso
    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
        counter!("rinkside_translate_coalesced_total").increment(1);
    }

    /// Registra una llamada al upstream y, si fallo, la razon (status o "transport")
    pub fn record_upstream(&self, duration: Duration, failure: Option<String>) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        counter!("rinkside_upstream_requests_total").increment(1);
        histogram!("rinkside_upstream_duration_seconds").record(duration.as_secs_f64());

        if let Some(reason) = failure {
            self.upstream_errors.fetch_add(1, Ordering::Relaxed);
            counter!("rinkside_upstream_errors_total", "reason" => reason).increment(1);
        }
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de requests coalesced
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    /// Retorna el numero de llamadas al upstream
    pub fn upstream_calls(&self) -> u64 {
        self.upstream_calls.load(Ordering::Relaxed)
    }

    /// Retorna el numero de llamadas fallidas al upstream
    pub fn upstream_errors(&self) -> u64 {
        self.upstream_errors.load(Ordering::Relaxed)
    }
}
