//! Configuration for the EVM client
//!
//! Values come from built-in defaults, then the first `evm.toml`/`evm.json` found on the
//! search path (section `[evm]`), then `EVM_*` environment variables.

use config::{Config as ConfigLoader, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::evm::types::EvmError;
use alloy_primitives::Address;

/// Environment variable prefix for EVM settings
const ENV_PREFIX: &str = "EVM";

const DEFAULT_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_CHAIN_ID: u64 = 1;
const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1000;

/// EVM client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Chain ID for transactions
    pub chain_id: u64,
    /// Node-managed account used when a message names no sender
    pub from_address: Option<String>,
    /// Delay between receipt polls in milliseconds
    pub receipt_poll_interval_ms: u64,
}

/// File representation; every field optional so partial files merge over defaults
#[derive(Debug, Clone, Default, Deserialize)]
struct EvmFileConfig {
    rpc_url: Option<String>,
    chain_id: Option<u64>,
    from_address: Option<String>,
    receipt_poll_interval_ms: Option<u64>,
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            from_address: None,
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
        }
    }
}

impl EvmConfig {
    /// Load configuration from defaults, files and environment, then validate
    pub fn load() -> Result<Self, Error> {
        let mut config = Self::default();
        config.load_from_files()?;
        config.load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file over the defaults, then validate
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let mut config = Self::default();
        config.merge_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_files(&mut self) -> Result<(), Error> {
        let config_dir = env::var("EVM_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let config_files = ["evm.toml", "evm.json"];
        let search_paths = [config_dir, "config".to_string(), ".".to_string()];

        for search_path in &search_paths {
            for config_file in &config_files {
                let file_path = Path::new(search_path).join(config_file);
                if file_path.exists() {
                    return self.merge_file(&file_path);
                }
            }
        }

        Ok(())
    }

    fn merge_file(&mut self, file_path: &Path) -> Result<(), Error> {
        let file_format = match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        };

        let settings = ConfigLoader::builder()
            .add_source(File::from(file_path).format(file_format))
            .build()
            .map_err(|e| Error::Config(format!("Failed to load config file: {}", e)))?;

        let file_config = match settings.get::<EvmFileConfig>("evm") {
            Ok(file_config) => file_config,
            Err(config::ConfigError::NotFound(_)) => return Ok(()),
            Err(e) => {
                return Err(Error::Config(format!(
                    "Invalid [evm] section in {}: {}",
                    file_path.display(),
                    e
                )))
            }
        };

        if let Some(rpc_url) = file_config.rpc_url {
            self.rpc_url = rpc_url;
        }
        if let Some(chain_id) = file_config.chain_id {
            self.chain_id = chain_id;
        }
        if file_config.from_address.is_some() {
            self.from_address = file_config.from_address;
        }
        if let Some(interval) = file_config.receipt_poll_interval_ms {
            self.receipt_poll_interval_ms = interval;
        }

        Ok(())
    }

    fn load_from_env(&mut self) -> Result<(), Error> {
        if let Ok(rpc_url) = env::var(format!("{}_RPC_URL", ENV_PREFIX)) {
            self.rpc_url = rpc_url;
        }

        if let Ok(chain_id) = env::var(format!("{}_CHAIN_ID", ENV_PREFIX)) {
            self.chain_id = chain_id
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {}_CHAIN_ID: {}", ENV_PREFIX, e)))?;
        }

        if let Ok(from) = env::var(format!("{}_FROM_ADDRESS", ENV_PREFIX)) {
            self.from_address = Some(from);
        }

        if let Ok(interval) = env::var(format!("{}_RECEIPT_POLL_INTERVAL_MS", ENV_PREFIX)) {
            self.receipt_poll_interval_ms = interval.parse().map_err(|e| {
                Error::Config(format!(
                    "Invalid {}_RECEIPT_POLL_INTERVAL_MS: {}",
                    ENV_PREFIX, e
                ))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        url::Url::parse(&self.rpc_url)
            .map_err(|e| Error::Config(format!("Invalid RPC URL '{}': {}", self.rpc_url, e)))?;

        if self.chain_id == 0 {
            return Err(Error::Config("Chain ID must be non-zero".to_string()));
        }

        if self.receipt_poll_interval_ms == 0 {
            return Err(Error::Config(
                "Receipt poll interval must be greater than zero".to_string(),
            ));
        }

        self.from_address()?;
        Ok(())
    }

    /// Parsed default sender, if configured
    pub fn from_address(&self) -> Result<Option<Address>, Error> {
        self.from_address
            .as_deref()
            .map(|s| {
                Address::from_str(s)
                    .map_err(|e| Error::from(EvmError::InvalidAddress(format!("{}: {}", s, e))))
            })
            .transpose()
    }

    /// Receipt poll interval as a `Duration`
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
