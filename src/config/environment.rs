//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;

/// URL base del servicio remoto de vehículos
pub const DEFAULT_CARS_API_BASE_URL: &str = "https://backend-devadil786-gmailcom-devadil.vercel.app";

/// 50 MB: hasta 10 imágenes por formulario
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cars_api_base_url: String,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub log_level: tracing::Level,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cars_api_base_url: DEFAULT_CARS_API_BASE_URL.to_string(),
            cors_origins: Vec::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno (llamar después de `dotenv()`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => defaults.port,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_UPLOAD_BYTES must be a valid number, got '{}'", raw))?,
            None => defaults.max_upload_bytes,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<tracing::Level>()
                .map_err(|_| anyhow::anyhow!("LOG_LEVEL must be one of trace|debug|info|warn|error, got '{}'", raw))?,
            None => defaults.log_level,
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: var("HOST").unwrap_or(defaults.host),
            cars_api_base_url: var("CARS_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.cars_api_base_url),
            cors_origins,
            max_upload_bytes,
            log_level,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
