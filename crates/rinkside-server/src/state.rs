//! Estado de la aplicacion.

use std::sync::Arc;

use rinkside_deepl::Translator;
use rinkside_store::JsonStore;

use crate::cache::{CacheConfig, TranslationCache};
use crate::metrics::CacheMetrics;
use crate::translate::TranslationService;

/// Estado compartido por todos los handlers.
#[derive(Clone)]
pub struct AppState {
    translations: TranslationService,
    store: Arc<JsonStore>,
}

impl AppState {
    /// Crea un AppState a partir de sus partes.
    pub fn new(translations: TranslationService, store: Arc<JsonStore>) -> Self {
        Self {
            translations,
            store,
        }
    }

    /// Crea un AppState con un cache nuevo delante de `translator`.
    pub fn with_translator(
        translator: Arc<dyn Translator>,
        cache_config: CacheConfig,
        store: JsonStore,
    ) -> Self {
        let cache = TranslationCache::new(cache_config, CacheMetrics::new());
        Self::new(
            TranslationService::new(translator, cache),
            Arc::new(store),
        )
    }

    /// Retorna el servicio de traduccion.
    pub fn translations(&self) -> &TranslationService {
        &self.translations
    }

    /// Retorna el store de documentos.
    pub fn store(&self) -> &JsonStore {
        &self.store
    }
}
