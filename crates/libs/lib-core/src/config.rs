//! # Application Configuration
//!
//! The page has exactly one setting: the chain the wallet is expected to be on.
//! It is fixed when the wasm bundle is built, never at runtime:
//!
//! ```text
//! MEISHI_TARGET_CHAIN_ID=0x89 trunk build --release
//! ```
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let target = config.target_chain_id;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].
//! Library code takes a [`Config`] by value instead, so tests never depend on the global.

use std::sync::OnceLock;

use crate::chain::ChainId;
use crate::error::WalletError;

/// Build-time variable holding the target chain id (hex or decimal).
pub const TARGET_CHAIN_ENV: &str = "MEISHI_TARGET_CHAIN_ID";

/// Used when [`TARGET_CHAIN_ENV`] is not set at build time.
pub const DEFAULT_TARGET_CHAIN_ID: ChainId = ChainId::POLYGON;

/// Application configuration baked in at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The single network the page expects the wallet to be active on.
    pub target_chain_id: ChainId,
}

impl Config {
    pub fn new(target_chain_id: ChainId) -> Self {
        Self { target_chain_id }
    }

    /// Load configuration from variables captured at compile time.
    pub fn from_build_env() -> Result<Self, WalletError> {
        Self::from_raw(option_env!("MEISHI_TARGET_CHAIN_ID"))
    }

    fn from_raw(raw: Option<&str>) -> Result<Self, WalletError> {
        let target_chain_id = match raw {
            Some(value) => ChainId::parse(value).map_err(|e| {
                WalletError::Config(format!("{TARGET_CHAIN_ENV} must be a chain id: {e}"))
            })?,
            None => DEFAULT_TARGET_CHAIN_ID,
        };

        Ok(Self { target_chain_id })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.target_chain_id.get() == 0 {
            return Err(WalletError::Config(format!(
                "{TARGET_CHAIN_ENV} must not be 0"
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_CHAIN_ID)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// This should be called once at application startup, before the wallet
/// context is provided.
///
/// # Errors
///
/// Returns an error if:
/// - The build-time chain id is not a number
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), WalletError> {
    let config = Config::from_build_env()?;
    config.validate()?;

    tracing::info!(target_chain = %config.target_chain_id, "configuration loaded");

    CONFIG
        .set(config)
        .map_err(|_| WalletError::Config("Config has already been initialized".to_string()))
}

/// Get a reference to the global configuration.
///
/// Falls back to [`Config::default`] when [`init_config()`] was never called,
/// so a misordered startup still renders the page.
pub fn core_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        tracing::warn!("core_config() read before init_config(); using defaults");
        Config::default()
    })
}
