use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::export::ExportOptions;

pub const DATA_DIR_ENV: &str = "SALES_REPORT_HOME";
const APP_DIR_NAME: &str = ".sales-report";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Names every installation starts with, before anything is registered.
pub const DEFAULT_SEED_SALESPERSONS: [&str; 1] = ["Sales Representative"];

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReportConfig {
    /// Salesperson used when none is given on the command line.
    pub salesperson: Option<String>,
    pub seed_salespersons: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            salesperson: None,
            seed_salespersons: DEFAULT_SEED_SALESPERSONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub report: ReportConfig,
    pub export: ExportOptions,
}

impl AppConfig {
    /// An explicit path must exist. Without one, the default location is
    /// optional and built-in defaults are used when it is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match dirs::home_dir() {
                Some(home) => {
                    let p = home.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
                    if !p.exists() {
                        debug!(path = %p.display(), "no config file, using defaults");
                        return Ok(Self::default());
                    }
                    p
                }
                None => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        let env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_data_dir(env, dirs::home_dir())
    }

    /// `store.data_dir`, then the env override, then `<home>/.sales-report`.
    pub fn resolve_data_dir(&self, env: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        self.store
            .data_dir
            .clone()
            .or(env)
            .or_else(|| home.map(|h| h.join(APP_DIR_NAME)))
            .ok_or(ConfigError::Missing)
    }
}
