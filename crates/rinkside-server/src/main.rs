//! Binario del servidor Rinkside.

use std::sync::Arc;

use anyhow::Context;
use rinkside_deepl::{DeepLClient, Translator, Unconfigured};
use rinkside_server::{AppState, Settings, cors_layer, metrics::init_metrics, run_server_with_state};
use rinkside_store::JsonStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::load().context("failed to load settings")?;
    let addr = settings.bind_addr()?;

    tracing::info!("Starting Rinkside server v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?settings, "Loaded settings");

    let translator: Arc<dyn Translator> = match settings.deepl_config()? {
        Some(config) => {
            let client = DeepLClient::new(config).context("failed to build DeepL client")?;
            tracing::info!(plan = %client.plan(), "DeepL upstream configured");
            Arc::new(client)
        },
        None => {
            tracing::warn!("No DeepL API key configured; /api/translate will answer 503");
            Arc::new(Unconfigured)
        },
    };

    let store = JsonStore::open(&settings.store.path)
        .await
        .with_context(|| format!("failed to open store {}", settings.store.path.display()))?;
    tracing::info!(
        path = %settings.store.path.display(),
        collections = store.collections().await.len(),
        "Document store opened"
    );

    let prometheus = init_metrics().context("failed to install metrics recorder")?;
    let cors = cors_layer(settings.server.cors_allow_origin.as_deref())
        .context("invalid server.cors_allow_origin")?;

    let state = AppState::with_translator(translator, settings.cache_config(), store);

    run_server_with_state(addr, state, prometheus, cors).await?;

    Ok(())
}

/// `RUST_LOG` elige los niveles (default `info`); `RINKSIDE_LOG_FORMAT=json`
/// cambia a lineas JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RINKSIDE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
