use serde::Serialize;

use crate::translate::{ResultSource, TranslateOutcome};

/// Response de `POST /api/translate`.
///
/// El front-end solo lee `translation`; `detected_source_lang` se llena
/// cuando el request no traia idioma origen.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateResponse {
    /// Texto traducido
    pub translation: String,

    /// Idioma detectado por el upstream, si lo informo
    pub detected_source_lang: Option<String>,

    /// True si no hubo llamada al upstream para este request
    pub cached: bool,

    /// Origen del resultado: cache, upstream o coalesced
    pub source: ResultSource,
}

impl From<TranslateOutcome> for TranslateResponse {
    fn from(outcome: TranslateOutcome) -> Self {
        Self {
            translation: outcome.translation.text.clone(),
            detected_source_lang: outcome
                .translation
                .detected_source_lang
                .as_ref()
                .map(|lang| lang.to_string()),
            cached: outcome.cached(),
            source: outcome.source,
        }
    }
}

/// Response de `POST /api/translate/batch`, en el orden del request.
#[derive(Debug, Clone, Serialize)]
pub struct BatchTranslateResponse {
    pub translations: Vec<TranslateResponse>,
}

/// Response para operaciones de invalidación.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Número de entries invalidadas.
    pub invalidated: usize,
    /// Mensaje descriptivo.
    pub message: String,
}

/// Response de `GET /api/db`.
#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<String>,
}
