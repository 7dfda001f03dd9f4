//! Configuracion del servidor.
//!
//! Fuentes, de menor a mayor precedencia: defaults, un archivo TOML opcional
//! (`rinkside.toml`, o el path en `RINKSIDE_CONFIG`) y variables de entorno
//! como `RINKSIDE_CACHE__TTL_SECONDS=3600`. `DEEPL_API_KEY` se usa cuando no
//! hay otra key configurada.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use rinkside_deepl::{DeepLConfig, EndpointMode, RetryPolicy, TranslateError};
use serde::Deserialize;

use crate::cache::CacheConfig;

/// Archivo de configuracion por defecto, relativo al directorio de trabajo.
pub const DEFAULT_CONFIG_FILE: &str = "rinkside.toml";

/// Errores al cargar la configuracion.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub deepl: DeepLSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origen CORS permitido; `*` o sin valor permite cualquiera.
    pub cors_allow_origin: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_allow_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: u64,
    pub ttl_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            max_capacity: defaults.max_capacity,
            ttl_seconds: defaults.ttl_seconds,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DeepLSettings {
    pub api_key: String,
    /// `auto`, `free` o `pro`.
    pub endpoint: String,
    /// Reemplaza ambas URLs de plan, p. ej. para apuntar a un mock local.
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Tasa de requests salientes; 0 desactiva el throttling.
    pub requests_per_second: u32,
}

impl Default for DeepLSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "auto".to_string(),
            base_url: None,
            timeout_seconds: 15,
            max_retries: 1,
            retry_delay_ms: 1_000,
            requests_per_second: 0,
        }
    }
}

impl std::fmt::Debug for DeepLSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLSettings")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("endpoint", &self.endpoint)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Documento JSON detras de `/api/db`.
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db.json"),
        }
    }
}

impl Settings {
    /// Carga la configuracion desde el entorno del proceso y el archivo.
    pub fn load() -> Result<Self, SettingsError> {
        let file = std::env::var("RINKSIDE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        let settings = Self::load_from(Path::new(&file), environment())?;
        Ok(settings.with_api_key_fallback(std::env::var("DEEPL_API_KEY").ok()))
    }

    /// Carga la configuracion desde un TOML opcional y la fuente de entorno dada.
    pub fn load_from(file: &Path, env: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(file).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Usa `key` como API key de DeepL si no hay ninguna configurada.
    pub fn with_api_key_fallback(mut self, key: Option<String>) -> Self {
        if self.deepl.api_key.trim().is_empty() {
            if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
                self.deepl.api_key = key;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cache.max_capacity == 0 {
            return Err(SettingsError::invalid(
                "cache.max_capacity",
                "must be greater than 0",
            ));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(SettingsError::invalid(
                "cache.ttl_seconds",
                "must be greater than 0",
            ));
        }
        if self.deepl.timeout_seconds == 0 {
            return Err(SettingsError::invalid(
                "deepl.timeout_seconds",
                "must be greater than 0",
            ));
        }
        EndpointMode::parse(&self.deepl.endpoint)
            .map_err(|e| SettingsError::invalid("deepl.endpoint", e.to_string()))?;
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| SettingsError::invalid("server.host", e.to_string()))?;
        Ok(())
    }

    /// Direccion donde escucha el servidor HTTP.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|e| SettingsError::invalid("server.host", e.to_string()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_seconds: self.cache.ttl_seconds,
            max_capacity: self.cache.max_capacity,
        }
    }

    /// Construye la configuracion del cliente DeepL.
    ///
    /// Retorna `Ok(None)` si no hay API key; el servidor corre entonces con
    /// la traduccion deshabilitada.
    pub fn deepl_config(&self) -> Result<Option<DeepLConfig>, TranslateError> {
        let deepl = &self.deepl;
        if deepl.api_key.trim().is_empty() {
            return Ok(None);
        }

        let mut builder = DeepLConfig::builder()
            .api_key(deepl.api_key.trim())
            .endpoint(EndpointMode::parse(&deepl.endpoint)?)
            .timeout(Duration::from_secs(deepl.timeout_seconds))
            .retry(RetryPolicy::new(
                deepl.max_retries,
                Duration::from_millis(deepl.retry_delay_ms),
            ))
            .requests_per_second(deepl.requests_per_second);

        if let Some(url) = &deepl.base_url {
            builder = builder.base_url(url);
        }

        builder.build().map(Some)
    }
}

/// Variables con prefijo `RINKSIDE_`, `__` separa keys anidadas.
pub fn environment() -> Environment {
    Environment::with_prefix("RINKSIDE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinkside_deepl::DeepLPlan;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn no_file() -> PathBuf {
        PathBuf::from("/nonexistent/rinkside.toml")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_from(&no_file(), env(&[])).unwrap();

        assert_eq!(settings.server.port, 3001);
        assert_eq!(settings.cache.max_capacity, 1_000);
        assert_eq!(settings.cache.ttl_seconds, 86_400);
        assert_eq!(settings.deepl.endpoint, "auto");
        assert_eq!(settings.deepl.max_retries, 1);
        assert_eq!(settings.store.path, PathBuf::from("db.json"));
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::load_from(
            &no_file(),
            env(&[
                ("RINKSIDE_SERVER__PORT", "8080"),
                ("RINKSIDE_CACHE__TTL_SECONDS", "60"),
                ("RINKSIDE_DEEPL__ENDPOINT", "pro"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cache.ttl_seconds, 60);
        assert_eq!(settings.deepl.endpoint, "pro");
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[cache]\nmax_capacity = 50\nttl_seconds = 120\n\n[store]\npath = \"/data/db.json\""
        )
        .unwrap();

        let settings =
            Settings::load_from(file.path(), env(&[("RINKSIDE_CACHE__TTL_SECONDS", "30")]))
                .unwrap();

        assert_eq!(settings.cache.max_capacity, 50);
        assert_eq!(settings.cache.ttl_seconds, 30);
        assert_eq!(settings.store.path, PathBuf::from("/data/db.json"));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = Settings::load_from(&no_file(), env(&[("RINKSIDE_CACHE__MAX_CAPACITY", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("cache.max_capacity"));
    }

    #[test]
    fn test_rejects_unknown_endpoint() {
        let err = Settings::load_from(&no_file(), env(&[("RINKSIDE_DEEPL__ENDPOINT", "beta")]))
            .unwrap_err();
        assert!(err.to_string().contains("deepl.endpoint"));
    }

    #[test]
    fn test_api_key_fallback() {
        let settings = Settings::default().with_api_key_fallback(Some("abc:fx".to_string()));
        assert_eq!(settings.deepl.api_key, "abc:fx");

        let mut configured = Settings::default();
        configured.deepl.api_key = "own".to_string();
        let configured = configured.with_api_key_fallback(Some("abc:fx".to_string()));
        assert_eq!(configured.deepl.api_key, "own");
    }

    #[test]
    fn test_deepl_config_without_key_is_none() {
        assert!(Settings::default().deepl_config().unwrap().is_none());
    }

    #[test]
    fn test_deepl_config_from_settings() {
        let mut settings = Settings::default();
        settings.deepl.api_key = "secret:fx".to_string();
        settings.deepl.requests_per_second = 5;

        let config = settings.deepl_config().unwrap().unwrap();
        assert_eq!(config.initial_plan(), DeepLPlan::Free);
        assert_eq!(config.requests_per_second().map(|r| r.get()), Some(5));
        assert!(!format!("{:?}", settings.deepl).contains("secret"));
    }

    #[test]
    fn test_bind_addr() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr().unwrap().to_string(), "0.0.0.0:3001");
    }
}
