//! # Shared Wire Types
//!
//! Types that cross the boundary between the wallet session core and the
//! browser-injected provider, plus display helpers used by both the core
//! and the web front end.
//!
//! ## Structure
//!
//! - **[`dto`]**: EIP-1193 request/response shapes
//!   - **[`dto::rpc`]**: `request()` arguments, provider errors, chain-switch params
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Shorten an address for display
//!   - **[`utils::abbreviate_address`]**: `0x1234...abcd` form used in the header
//!
//! ## Wire Format
//!
//! DTOs serialize to the JSON the injected provider expects:
//! - Field names follow the provider's **camelCase** convention via `#[serde(rename_all = "camelCase")]`
//! - Optional fields are omitted from JSON when `None`
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::rpc::{RequestArguments, SwitchEthereumChainParameter};
//!
//! let args = RequestArguments::with_params(
//!     "wallet_switchEthereumChain",
//!     serde_json::json!([SwitchEthereumChainParameter::new("0x89")]),
//! );
//! assert_eq!(args.method, "wallet_switchEthereumChain");
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
