//! Invalidacion masiva del cache.

use crate::cache::TranslationCache;
use rinkside_core::LangCode;
use tracing::info;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: usize,
    /// Idioma destino filtrado, si hubo filtro.
    pub target: Option<LangCode>,
}

impl TranslationCache {
    /// Invalida todas las entradas.
    pub async fn invalidate_everything(&self) -> InvalidationResult {
        self.sync().await;
        let count = self.entry_count() as usize;
        self.inner().invalidate_all();
        self.sync().await;

        info!(count, "All cached translations invalidated");

        InvalidationResult {
            count,
            target: None,
        }
    }

    /// Invalida las traducciones hacia un idioma destino.
    ///
    /// Útil cuando el glosario de un idioma cambia y las traducciones
    /// viejas ya no sirven.
    pub async fn invalidate_by_target(&self, target: &LangCode) -> InvalidationResult {
        let keys: Vec<_> = self
            .iter()
            .filter(|(key, _)| key.target() == target)
            .map(|(key, _)| key)
            .collect();

        for key in &keys {
            self.invalidate(key).await;
        }
        self.sync().await;

        info!(target = %target, count = keys.len(), "Cached translations invalidated");

        InvalidationResult {
            count: keys.len(),
            target: Some(target.clone()),
        }
    }
}
