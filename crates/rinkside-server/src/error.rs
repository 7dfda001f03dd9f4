use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rinkside_core::RinksideError;
use rinkside_deepl::TranslateError;
use rinkside_store::StoreError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// Parametros invalidos
    BadRequest(String),

    /// Recurso no encontrado
    NotFound(String),

    /// El registro ya existe
    Conflict(String),

    /// Fallo del servicio de traduccion
    Upstream(TranslateError),

    /// Error interno
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Internal(msg) => msg,
            AppError::Upstream(err) => err.to_string(),
        };

        let body = Json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<RinksideError> for AppError {
    fn from(err: RinksideError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<TranslateError> for AppError {
    fn from(err: TranslateError) -> Self {
        AppError::Upstream(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CollectionNotFound(_) | StoreError::RecordNotFound { .. } => {
                AppError::NotFound(err.to_string())
            },
            StoreError::Conflict { .. } => AppError::Conflict(err.to_string()),
            StoreError::InvalidRecord(_) => AppError::BadRequest(err.to_string()),
            StoreError::Io(_) | StoreError::Json(_) => {
                tracing::error!(error = %err, "Store failure");
                AppError::Internal("failed to access the data store".to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_status() {
        let cases = [
            (StoreError::CollectionNotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::record_not_found("news", "1"), StatusCode::NOT_FOUND),
            (StoreError::conflict("news", "1"), StatusCode::CONFLICT),
            (StoreError::InvalidRecord("bad".into()), StatusCode::BAD_REQUEST),
            (
                StoreError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_upstream_errors_map_to_status() {
        let rate_limited = AppError::from(TranslateError::upstream(429, ""));
        assert_eq!(rate_limited.status(), StatusCode::TOO_MANY_REQUESTS);

        let unavailable = AppError::from(TranslateError::NotConfigured);
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let timeout = AppError::from(TranslateError::transport("timed out", true));
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = AppError::from(RinksideError::invalid_request("text must not be empty"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
