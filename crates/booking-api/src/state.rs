//! # Application State
//!
//! Shared state for the Axum application.
//! Wraps the Coordinator together with the server configuration.

use anyhow::Context;
use booking_core::{Coordinator, TourCatalog};
use booking_remote::{HttpBookingStore, HttpPaymentInitiator, RemoteConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit tour catalog file; searched for when unset
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            catalog_path: lookup("TOUR_CATALOG_PATH").map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub config: AppConfig,
}

impl AppState {
    /// Wire the HTTP booking store and payment API from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_tour_catalog(config.catalog_path.as_deref())?;

        let remote = RemoteConfig::from_env().context("failed to load remote service config")?;
        let store = HttpBookingStore::new(&remote).context("failed to initialize booking store")?;
        let payments =
            HttpPaymentInitiator::new(&remote).context("failed to initialize payment API")?;

        let coordinator = Coordinator::new(Arc::new(store), Arc::new(payments), catalog);

        Ok(Self::with_coordinator(coordinator, config))
    }

    pub fn with_coordinator(coordinator: Coordinator, config: AppConfig) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            config,
        }
    }
}

/// Load the tour catalog from `path`, or from `config/tours.toml` in the
/// working directory or one of its parents.
fn load_tour_catalog(path: Option<&Path>) -> anyhow::Result<TourCatalog> {
    if let Some(path) = path {
        return read_catalog(path);
    }

    let config_paths = [
        "config/tours.toml",
        "../config/tours.toml",
        "../../config/tours.toml",
    ];

    for path in config_paths.iter().map(Path::new) {
        if path.is_file() {
            return read_catalog(path);
        }
    }

    tracing::warn!("No tour catalog found, every booking will be rejected");
    Ok(TourCatalog::new())
}

fn read_catalog(path: &Path) -> anyhow::Result<TourCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let catalog = TourCatalog::from_toml(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} tours from {}", catalog.tours.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert!(config.catalog_path.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_from_lookup() {
        let config = AppConfig::from_lookup(|key| match key {
            "PORT" => Some("3000".into()),
            "ENVIRONMENT" => Some("production".into()),
            "TOUR_CATALOG_PATH" => Some("/etc/tours.toml".into()),
            _ => None,
        });
        assert_eq!(config.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/tours.toml")));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");

        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/tours.toml");
        let catalog = load_tour_catalog(Some(&path)).unwrap();
        assert!(catalog.active_tours().count() > 0);
    }

    #[test]
    fn test_missing_explicit_catalog_is_an_error() {
        assert!(load_tour_catalog(Some(Path::new("/nonexistent/tours.toml"))).is_err());
    }
}
