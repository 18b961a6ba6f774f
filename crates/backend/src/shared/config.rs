use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "ServiceEndpoint::default_pricing")]
    pub pricing: ServiceEndpoint,
    #[serde(default = "ServiceEndpoint::default_maps")]
    pub maps: ServiceEndpoint,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            pricing: ServiceEndpoint::default_pricing(),
            maps: ServiceEndpoint::default_maps(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/vehicles.db".into(),
        }
    }
}

/// Base URL of an auxiliary HTTP service
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceEndpoint {
    pub base_url: String,
}

impl ServiceEndpoint {
    fn default_pricing() -> Self {
        Self {
            base_url: "http://localhost:8082".into(),
        }
    }

    fn default_maps() -> Self {
        Self {
            base_url: "http://localhost:9191".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnrichmentConfig {
    /// Upper bound for each price/address lookup
    pub timeout_ms: u64,
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 8080

[database]
path = "target/db/vehicles.db"

[pricing]
base_url = "http://localhost:8082"

[maps]
base_url = "http://localhost:9191"

[enrichment]
timeout_ms = 3000
"#;

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.enrichment.timeout_ms == 0 {
        anyhow::bail!("enrichment.timeout_ms must be greater than zero");
    }
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}
