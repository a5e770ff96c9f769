use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SahayakError};

pub mod backends;

pub use backends::{BackendConfig, BackendsConfig};

const CONFIG_FILE_NAME: &str = "sahayak.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub log_file_enabled: bool,
    #[serde(default = "default_log_rotation")]
    pub log_rotation: String,
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default = "default_log_file_prefix")]
    pub log_file_prefix: String,
    /// Directory holding the bundled front-end; unset disables static serving
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            log_file_enabled: false,
            log_rotation: default_log_rotation(),
            log_dir: None,
            log_file_prefix: default_log_file_prefix(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

fn default_log_file_prefix() -> String {
    "sahayak".to_string()
}

fn default_static_dir() -> Option<String> {
    Some("client/build".to_string())
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::figment(path).extract()?;
        Ok(config)
    }

    /// Layered sources, later ones win: TOML file, `SAHAYAK_*` variables,
    /// then the conventional `PORT`, `HF_API_TOKEN` and `OPENAI_API_KEY`.
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("SAHAYAK_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(
                Env::raw()
                    .only(&["HF_API_TOKEN"])
                    .map(|_| "backends.huggingface.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "backends.openai.api_key".into()),
            )
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn data_dir() -> Result<PathBuf> {
        get_data_dir()
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(log_dir) = &self.server.log_dir {
            let path = PathBuf::from(log_dir);
            std::fs::create_dir_all(&path)?;
            Ok(path)
        } else {
            let log_dir = Self::data_dir()?.join("logs");
            std::fs::create_dir_all(&log_dir)?;
            Ok(log_dir)
        }
    }

    /// Write this configuration as TOML. Credentials are never written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut sanitized = self.clone();
        sanitized.backends.huggingface.api_key = None;
        sanitized.backends.openai.api_key = None;

        let toml_string = toml::to_string_pretty(&sanitized)
            .map_err(|e| SahayakError::Other(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}

fn get_config_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "sahayak").ok_or_else(|| {
        SahayakError::Config(figment::Error::from("Could not determine config directory"))
    })?;

    let config_dir = project_dirs.config_dir();
    std::fs::create_dir_all(config_dir)?;

    Ok(config_dir.to_path_buf())
}

fn get_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "sahayak").ok_or_else(|| {
        SahayakError::Config(figment::Error::from("Could not determine data directory"))
    })?;

    let data_dir = project_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}
