use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    middleware,
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::handlers::{
    collections::{
        create_record, delete_record, get_record, list_collections, list_records, patch_record,
        replace_record,
    },
    health::{health_check, upstream_health},
    metrics::metrics_handler,
    translate::{invalidate_cache, stats, translate, translate_batch},
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Construye la capa CORS. `None` o `*` permite cualquier origen.
pub fn cors_layer(allow_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = match allow_origin.map(str::trim) {
        None | Some("") | Some("*") => AllowOrigin::any(),
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any))
}

/// Crea el router con el estado de la aplicacion y el handle de metricas.
pub fn create_router_with_state(
    state: AppState,
    prometheus_handle: PrometheusHandle,
    cors: CorsLayer,
) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Router para el endpoint de metricas (otro estado)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Router principal de la aplicacion
    let app_router = Router::new()
        .route("/health", get(health_check))
        .route("/health/upstream", get(upstream_health))
        // Proxy de traduccion
        .route("/api/translate", post(translate))
        .route("/api/translate/batch", post(translate_batch))
        .route("/api/translate/stats", get(stats))
        .route("/api/translate/cache", delete(invalidate_cache))
        // Store de documentos
        .route("/api/db", get(list_collections))
        .route("/api/db/{collection}", get(list_records).post(create_record))
        .route(
            "/api/db/{collection}/{id}",
            get(get_record)
                .put(replace_record)
                .patch(patch_record)
                .delete(delete_record),
        )
        .with_state(state);

    // Combina routers y aplica middleware
    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        // Middleware de metricas HTTP
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(cors)
        .layer(middleware_stack)
}

/// Crea un router con solo el endpoint de health.
pub fn create_router() -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    Router::new()
        .route("/health", get(health_check))
        .layer(middleware)
}

/// Levanta el servidor con el estado y el handle de metricas dados.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
    cors: CorsLayer,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle, cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_wildcard_and_origin() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("*")).is_ok());
        assert!(cors_layer(Some("https://team.rinkside.app")).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
