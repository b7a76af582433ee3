//! Deployment configuration.
//!
//! ```toml
//! log_level = "info"
//!
//! [domain]
//! name = "OrderBook"
//! version = "1"
//! chain_id = 31337
//! verifying_contract = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
//!
//! [settlement]
//! address = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
//! owner = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! fee_numerator = 2
//! fee_denominator = 1000
//! fee_split_numerator = 0
//! ```
//!
//! `fee_split_recipient` and `fee_token` are optional. `ORDERBOOK_LOG_LEVEL`
//! overrides `log_level` when loading from a file.

use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::fees::{
    check_fee, check_fee_split, FeeConfig, DEFAULT_FEE_DENOMINATOR, DEFAULT_FEE_NUMERATOR,
};
use crate::engine::Settlement;
use crate::orderbook::OrderBook;
use crate::types::{Domain, DEFAULT_NAME, DEFAULT_VERSION};

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "ORDERBOOK_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default `tracing` filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    pub domain: DomainConfig,

    pub settlement: SettlementConfig,
}

/// Signing domain of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    pub chain_id: u64,

    /// Registry address bound into every order hash
    pub verifying_contract: Address,
}

/// Settlement account, owner and fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Account makers approve
    pub address: Address,

    /// Fee administrator
    pub owner: Address,

    #[serde(default = "default_fee_numerator")]
    pub fee_numerator: u64,

    #[serde(default = "default_fee_denominator")]
    pub fee_denominator: u64,

    #[serde(default)]
    pub fee_split_numerator: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_split_recipient: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_token: Option<Address>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_fee_numerator() -> u64 {
    DEFAULT_FEE_NUMERATOR
}

fn default_fee_denominator() -> u64 {
    DEFAULT_FEE_DENOMINATOR
}

impl Config {
    /// Configuration with default name, version and fees
    pub fn new(
        chain_id: u64,
        verifying_contract: Address,
        settlement: Address,
        owner: Address,
    ) -> Self {
        Self {
            log_level: default_log_level(),
            domain: DomainConfig {
                name: default_name(),
                version: default_version(),
                chain_id,
                verifying_contract,
            },
            settlement: SettlementConfig {
                address: settlement,
                owner,
                fee_numerator: DEFAULT_FEE_NUMERATOR,
                fee_denominator: DEFAULT_FEE_DENOMINATOR,
                fee_split_numerator: 0,
                fee_split_recipient: None,
                fee_token: None,
            },
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, override from the environment and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path)?;
        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            debug!("Overriding log level from environment");
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.name.is_empty() {
            return Err(ConfigError::Invalid("domain name must not be empty".to_string()));
        }
        if self.domain.verifying_contract == Address::ZERO {
            return Err(ConfigError::Invalid(
                "verifying contract must be set".to_string(),
            ));
        }
        if self.settlement.address == Address::ZERO {
            return Err(ConfigError::Invalid(
                "settlement address must be set".to_string(),
            ));
        }
        if self.settlement.owner == Address::ZERO {
            return Err(ConfigError::Invalid("owner must be set".to_string()));
        }
        if self.settlement.fee_split_recipient == Some(Address::ZERO) {
            return Err(ConfigError::Invalid(
                "fee split recipient must not be the zero address".to_string(),
            ));
        }
        check_fee(self.settlement.fee_numerator, self.settlement.fee_denominator)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        check_fee_split(self.settlement.fee_split_numerator)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn domain(&self) -> Domain {
        Domain::new(
            self.domain.name.clone(),
            self.domain.version.clone(),
            self.domain.chain_id,
            self.domain.verifying_contract,
        )
    }

    pub fn fees(&self) -> FeeConfig {
        FeeConfig {
            fee_numerator: self.settlement.fee_numerator,
            fee_denominator: self.settlement.fee_denominator,
            fee_split_numerator: self.settlement.fee_split_numerator,
            fee_split_recipient: self.settlement.fee_split_recipient,
            fee_token: self.settlement.fee_token,
        }
    }

    /// Empty order book for the configured domain
    pub fn order_book(&self) -> OrderBook {
        OrderBook::new(self.domain())
    }

    /// Settlement engine with the configured account, owner and fees
    pub fn settlement(&self) -> Result<Settlement, ConfigError> {
        Settlement::new(self.settlement.address, self.settlement.owner, self.fees())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
