//! # Data Transfer Objects (DTOs)
//!
//! Structures exchanged with a browser-injected EIP-1193 provider.
//!
//! ## Module Organization
//!
//! - [`rpc`] - `request()` arguments, provider RPC errors and method parameters
//!
//! ## Example Exchange
//!
//! ```text
//! ethereum.request({ method: "wallet_switchEthereumChain", params: [{ chainId: "0x89" }] })
//! ```
//!
//! ```text
//! { "code": 4902, "message": "Unrecognized chain ID \"0x89\"." }
//! ```

pub mod rpc;

pub use rpc::*;
