use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ics::{RenderMode, DEFAULT_PROD_ID, DEFAULT_UID_DOMAIN};
use crate::scraping::{locate::StrategyKind, schema::Schema};
use crate::utils;

pub const NAF_URL: &str = "https://member.thenaf.net/index.php?module=NAF&type=tournaments";
pub const DEFAULT_OUTPUT: &str = "calendar.ics";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    Missing(PathBuf),
    #[error("unable to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown schema {0:?}, expected one of {1:?}")]
    UnknownSchema(String, [&'static str; 2]),
    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub source_url: String,
    pub output_path: PathBuf,
    pub timeout_secs: u64,
    pub schema: String,
    pub strategies: Vec<StrategyKind>,
    pub render_mode: RenderMode,
    pub prod_id: String,
    pub uid_domain: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: NAF_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            schema: "naf".to_string(),
            strategies: StrategyKind::default_order(),
            render_mode: RenderMode::AllDay,
            prod_id: DEFAULT_PROD_ID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, which must exist, or the per-user config file when `path`
    /// is `None`. Only a missing per-user file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            Some(path) => read_config(path)?,
            None => {
                let path = utils::config_path();
                if path.exists() {
                    read_config(&path)?
                } else {
                    AppConfig::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.resolve_schema().map(|_| ())
    }

    pub fn resolve_schema(&self) -> Result<Schema, ConfigError> {
        Schema::by_name(&self.schema)
            .ok_or_else(|| ConfigError::UnknownSchema(self.schema.clone(), Schema::available()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
