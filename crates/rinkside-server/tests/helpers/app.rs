//! Aplicacion de prueba con un upstream simulado.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rinkside_core::{LangCode, Translation, TranslationKey};
use rinkside_deepl::{TranslateError, Translator};
use rinkside_server::cache::CacheConfig;
use rinkside_server::metrics::setup::detached_handle;
use rinkside_server::{AppState, cors_layer, create_router_with_state};
use rinkside_store::JsonStore;
use serde_json::{Map, Value};

use super::client::TestClient;

/// Upstream simulado: traduce a `"<TARGET>:<text>"` y cuenta las llamadas.
///
/// Sin idioma origen informa `EN` como detectado.
pub struct MockTranslator {
    calls: AtomicU32,
    delay: Duration,
    failure: Mutex<Option<TranslateError>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicU32::new(0),
            delay,
            failure: Mutex::new(None),
        }
    }

    /// Hace que las siguientes llamadas fallen con `err` (None las normaliza).
    pub fn fail_with(&self, err: Option<TranslateError>) {
        *self.failure.lock() = err;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, key: &TranslationKey) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failure = self.failure.lock().clone();
        if let Some(err) = failure {
            return Err(err);
        }

        let detected = match key.source() {
            Some(_) => None,
            None => Some(LangCode::parse("en").unwrap()),
        };
        Ok(Translation::new(
            format!("{}:{}", key.target(), key.text()),
            detected,
        ))
    }

    async fn health_check(&self) -> Result<(), TranslateError> {
        let failure = self.failure.lock().clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Router completo con upstream simulado y store en memoria.
pub struct TestApp {
    pub client: TestClient,
    pub translator: Arc<MockTranslator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(MockTranslator::new(), Map::new())
    }

    /// Con un documento inicial para `/api/db`.
    pub fn with_db(db: Value) -> Self {
        let data = match db {
            Value::Object(map) => map,
            other => panic!("db fixture must be an object, got {}", other),
        };
        Self::build(MockTranslator::new(), data)
    }

    pub fn with_translator(translator: MockTranslator) -> Self {
        Self::build(translator, Map::new())
    }

    fn build(translator: MockTranslator, data: Map<String, Value>) -> Self {
        let translator = Arc::new(translator);
        let state = AppState::with_translator(
            translator.clone(),
            CacheConfig::default(),
            JsonStore::in_memory(data),
        );
        let router = create_router_with_state(state, detached_handle(), cors_layer(None).unwrap());

        Self {
            client: TestClient::new(router),
            translator,
        }
    }
}
