use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC method names issued to the injected provider.
pub mod methods {
    /// Prompt the user to authorize the page (opens the wallet popup).
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
    /// Accounts already authorized for this origin; never prompts.
    pub const ACCOUNTS: &str = "eth_accounts";
    pub const CHAIN_ID: &str = "eth_chainId";
    pub const CALL: &str = "eth_call";
    /// MetaMask extension API, not part of EIP-1193 proper.
    pub const SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
}

/// Provider event names (`ethereum.on(name, handler)`).
pub mod events {
    pub const ACCOUNTS_CHANGED: &str = "accountsChanged";
    pub const CHAIN_CHANGED: &str = "chainChanged";
}

/// Error codes from EIP-1193 and the MetaMask extension API.
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// A permission request for this origin is already pending in the wallet.
    pub const REQUEST_PENDING: i64 = -32002;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Argument object for `ethereum.request(args)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestArguments {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params: Some(params),
        }
    }
}

/// Error object a provider rejects `request()` with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == codes::USER_REJECTED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == codes::UNRECOGNIZED_CHAIN
    }
}

impl std::fmt::Display for ProviderRpcError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for ProviderRpcError {}

/// Single element of the `wallet_switchEthereumChain` params array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChainParameter {
    /// Hex quantity, `0x` prefixed, no leading zeros.
    pub chain_id: String,
}

impl SwitchEthereumChainParameter {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
        }
    }
}

/// Transaction-shaped object for a read-only `eth_call`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_switch_chain_params_use_camel_case() {
        let args = RequestArguments::with_params(
            methods::SWITCH_CHAIN,
            json!([SwitchEthereumChainParameter::new("0x89")]),
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(
            value,
            json!({ "method": "wallet_switchEthereumChain", "params": [{ "chainId": "0x89" }] })
        );
    }

    #[test]
    fn test_request_without_params_omits_field() {
        let value = serde_json::to_value(RequestArguments::new(methods::ACCOUNTS)).unwrap();
        assert_eq!(value, json!({ "method": "eth_accounts" }));
    }

    #[test]
    fn test_provider_error_from_wallet_payload() {
        let err: ProviderRpcError =
            serde_json::from_value(json!({ "code": 4001, "message": "User rejected the request." }))
                .unwrap();
        assert!(err.is_user_rejection());
        assert!(!err.is_unrecognized_chain());
        assert_eq!(err.to_string(), "User rejected the request. (code 4001)");
    }
}
