//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// External PDF renderer configuration.
    #[serde(default)]
    pub renderer: RendererConfig,
    /// Stored report configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Entity snapshot configuration.
    #[serde(default)]
    pub data: DataConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// External PDF renderer configuration.
///
/// The base URL is optional: without it, PDF exports fail as "renderer
/// unavailable" while HTML exports keep working.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Base address of the HTML-to-PDF service, e.g. `http://renderer:3000`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Upper bound for a single render call, in seconds.
    #[serde(default = "default_renderer_timeout")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_renderer_timeout(),
        }
    }
}

fn default_renderer_timeout() -> u64 {
    30
}

/// Where rendered PDF reports are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage provider.
    #[serde(default)]
    pub provider: StorageProvider,
}

/// Storage provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// In-process memory; contents vanish on restart.
    #[default]
    Memory,
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Entity snapshot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// JSON snapshot of accounts, budgets, templates and postings.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = temp_env::with_vars_unset(
            ["TALLY__RENDERER__BASE_URL", "TALLY__DATA__SNAPSHOT_PATH"],
            AppConfig::load,
        )
        .expect("config loads without files");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.renderer.base_url.is_none());
        assert_eq!(config.renderer.timeout_secs, 30);
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert!(config.data.snapshot_path.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = temp_env::with_vars(
            [
                ("TALLY__RENDERER__BASE_URL", Some("http://renderer:3000")),
                ("TALLY__DATA__SNAPSHOT_PATH", Some("/srv/tally/snapshot.json")),
            ],
            AppConfig::load,
        )
        .expect("config loads from env");

        assert_eq!(
            config.renderer.base_url.as_deref(),
            Some("http://renderer:3000")
        );
        assert_eq!(
            config.data.snapshot_path,
            Some(PathBuf::from("/srv/tally/snapshot.json"))
        );
    }

    #[test]
    fn test_storage_provider_tagged_serde() {
        let provider: StorageProvider =
            serde_json::from_str(r#"{"type":"local_fs","root":"./reports"}"#).expect("parse");
        assert_eq!(provider, StorageProvider::local_fs("./reports"));
        assert_eq!(provider.name(), "local");
        assert_eq!(StorageProvider::default().name(), "memory");
    }
}
