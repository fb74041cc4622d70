use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Disk,
    Memory,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub storage: StorageBackend,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            storage: StorageBackend::default(),
            data_path: None,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "polymath", "polymath")
        .context("Could not determine project directories")
}

impl AppConfig {
    /// Loads the config from the default location, using built-in defaults if
    /// no config file exists yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
