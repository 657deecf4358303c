//! # Centralized Error Handling
//!
//! This module defines [`WalletError`], the error type every wallet session
//! command resolves to. It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! None of these are fatal. Each leaves the session in its prior, well-defined
//! state and the page keeps working in "disconnected" or "wrong chain" mode.
//!
//! 1. **Environment** - the user has to act outside the page
//!    - [`NoProvider`](WalletError::NoProvider) - no wallet injected, or it went away
//!
//! 2. **User decisions** - retry is always allowed
//!    - [`UserRejected`](WalletError::UserRejected) - connection prompt declined
//!    - [`ChainSwitchRejected`](WalletError::ChainSwitchRejected) - switch prompt declined
//!    - [`UnknownChain`](WalletError::UnknownChain) - target chain not registered in the wallet
//!
//! 3. **Provider failures**
//!    - [`Provider`](WalletError::Provider) - anything else the provider reported
//!
//! 4. **Build configuration**
//!    - [`Config`](WalletError::Config) - the baked-in target chain is unusable
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{Result, WalletError};
//! use shared::dto::rpc::ProviderRpcError;
//!
//! fn connect(outcome: std::result::Result<Vec<String>, ProviderRpcError>) -> Result<String> {
//!     let accounts = outcome.map_err(WalletError::from_connect_rpc)?;
//!     accounts
//!         .into_iter()
//!         .next()
//!         .ok_or_else(|| WalletError::Provider("no accounts returned".to_string()))
//! }
//!
//! let err = connect(Err(ProviderRpcError::new(4001, "User rejected the request."))).unwrap_err();
//! assert_eq!(err.code(), "UserRejected");
//! ```

use shared::dto::rpc::ProviderRpcError;
use thiserror::Error;

use crate::chain::ChainId;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Outcome of a failed wallet command.
///
/// `Clone` so that callers joining an in-flight connect attempt all receive
/// the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected provider was detected, or it disappeared mid-session.
    #[error("No wallet provider detected")]
    NoProvider,

    /// The user declined the account-access prompt.
    #[error("User rejected the connection request: {0}")]
    UserRejected(String),

    /// The user declined the chain-switch prompt.
    #[error("Chain switch rejected: {0}")]
    ChainSwitchRejected(String),

    /// The wallet has no network registered under the requested id.
    #[error("Chain {0} is not registered in the wallet")]
    UnknownChain(ChainId),

    /// Any other provider-side failure, including malformed responses.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Build-time configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Map a rejected `eth_requestAccounts` / `eth_accounts` call.
    pub fn from_connect_rpc(err: ProviderRpcError) -> Self {
        if err.is_user_rejection() {
            WalletError::UserRejected(err.message)
        } else {
            WalletError::Provider(err.to_string())
        }
    }

    /// Map a rejected `wallet_switchEthereumChain` call for `target`.
    pub fn from_switch_rpc(err: ProviderRpcError, target: ChainId) -> Self {
        if err.is_user_rejection() {
            WalletError::ChainSwitchRejected(err.message)
        } else if err.is_unrecognized_chain() {
            WalletError::UnknownChain(target)
        } else {
            WalletError::Provider(err.to_string())
        }
    }

    /// Map a rejected read-only call (`eth_chainId`, `eth_call`).
    pub fn from_rpc(err: ProviderRpcError) -> Self {
        WalletError::Provider(err.to_string())
    }

    /// Stable variant name, suitable for logs and UI branching.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::NoProvider => "NoProvider",
            WalletError::UserRejected(_) => "UserRejected",
            WalletError::ChainSwitchRejected(_) => "ChainSwitchRejected",
            WalletError::UnknownChain(_) => "UnknownChain",
            WalletError::Provider(_) => "Provider",
            WalletError::Config(_) => "Config",
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Provider internals are not exposed; the full error goes to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::NoProvider => {
                "No wallet found. Install or enable a browser wallet such as MetaMask.".to_string()
            }
            WalletError::UserRejected(_) => "Connection request was declined.".to_string(),
            WalletError::ChainSwitchRejected(_) => "Network switch was declined.".to_string(),
            WalletError::UnknownChain(chain) => {
                format!("Your wallet does not know network {chain}. Add it and try again.")
            }
            WalletError::Provider(_) => "The wallet reported an error. Please retry.".to_string(),
            WalletError::Config(_) => {
                "This page was built with an invalid network setting.".to_string()
            }
        }
    }

    /// Whether the user can fix this by installing or enabling a wallet.
    pub fn needs_install(&self) -> bool {
        matches!(self, WalletError::NoProvider)
    }
}

/// Convert `serde_json::Error` to `WalletError`.
impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Provider(format!("Unexpected provider response: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use shared::dto::rpc::codes;

    use super::*;

    #[test]
    fn test_connect_rpc_mapping() {
        let rejected = WalletError::from_connect_rpc(ProviderRpcError::new(4001, "nope"));
        assert_eq!(rejected, WalletError::UserRejected("nope".to_string()));

        let pending = WalletError::from_connect_rpc(ProviderRpcError::new(
            codes::REQUEST_PENDING,
            "Already processing eth_requestAccounts",
        ));
        assert_eq!(pending.code(), "Provider");
    }

    #[test]
    fn test_switch_rpc_mapping() {
        let target = ChainId::POLYGON;
        assert_eq!(
            WalletError::from_switch_rpc(ProviderRpcError::new(4001, "denied"), target),
            WalletError::ChainSwitchRejected("denied".to_string())
        );
        assert_eq!(
            WalletError::from_switch_rpc(ProviderRpcError::new(4902, "unrecognized"), target),
            WalletError::UnknownChain(target)
        );
        assert_eq!(
            WalletError::from_switch_rpc(ProviderRpcError::new(-32603, "internal"), target).code(),
            "Provider"
        );
    }

    #[test]
    fn test_user_message_hides_provider_details() {
        let err = WalletError::Provider("stack trace from extension".to_string());
        assert!(!err.user_message().contains("stack trace"));
        assert!(WalletError::NoProvider.needs_install());
        assert!(!err.needs_install());

        let config = WalletError::Config("MEISHI_TARGET_CHAIN_ID must not be 0".to_string());
        assert_eq!(config.code(), "Config");
        assert!(!config.user_message().contains("wallet reported"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: WalletError = serde_json::from_str::<Vec<String>>("{}").unwrap_err().into();
        assert_eq!(err.code(), "Provider");
    }
}
