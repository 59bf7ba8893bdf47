use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProposalError, Result};

pub const DEFAULT_DATA_ROOT: &str = "/gpfs/exfel/exp";
pub const DEFAULT_INIT_SERVER: &str = "https://exfldadev01.desy.de/zwop";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub timeout_secs: u64,
    pub init_server: String,
    pub enable_cache: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            init_server: DEFAULT_INIT_SERVER.to_string(),
            enable_cache: true,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProposalConfig {
    pub data_root: PathBuf,
    pub mymdc: ClientConfig,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            mymdc: ClientConfig::default(),
        }
    }
}

impl ProposalConfig {
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ProposalError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_yaml(&raw).map_err(|detail| ProposalError::Config {
            path: path.to_path_buf(),
            detail,
        })
    }

    fn from_yaml(raw: &str) -> std::result::Result<Self, String> {
        // An empty document deserializes as unit, not as an empty mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    }
}
