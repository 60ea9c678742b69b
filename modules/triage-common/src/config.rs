use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Process configuration loaded from environment variables.
/// Tuning parameters live in the optional TOML [`FileConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub web_host: String,
    pub web_port: u16,
    pub allowed_origins: Vec<String>,
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let web_port = match lookup("WEB_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("WEB_PORT must be a port number, got {port:?}"))?,
            None => 8000,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or_else(|| vec!["http://localhost:5173".to_string()]);

        Ok(Self {
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
            allowed_origins,
            config_path: lookup("TRIAGE_CONFIG").map(PathBuf::from),
        })
    }

    /// CORS origins: the file's `[server] allowed_origins` when set,
    /// otherwise `ALLOWED_ORIGINS`.
    pub fn origins_with(&self, file: &FileConfig) -> Vec<String> {
        if file.server.allowed_origins.is_empty() {
            self.allowed_origins.clone()
        } else {
            file.server.allowed_origins.clone()
        }
    }

    /// Load the TOML file named by `TRIAGE_CONFIG`, or defaults when unset.
    pub fn file_config(&self) -> Result<FileConfig> {
        match &self.config_path {
            Some(path) => load_config(path),
            None => Ok(FileConfig::default()),
        }
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// TOML-backed tuning configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub clustering: ClusteringConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusteringConfig {
    /// Seed for k-means++ initialization. Fixed so output is reproducible.
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Overrides `ALLOWED_ORIGINS` when non-empty.
    pub allowed_origins: Vec<String>,
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    info!(path = %path.display(), seed = config.clustering.seed, "Loaded triage config");
    Ok(config)
}
