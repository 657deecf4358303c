//! # Core Library
//!
//! Chain identifiers, the wallet error taxonomy and build-time configuration
//! shared by the session core and the web front end.

pub mod chain;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use chain::ChainId;
pub use config::Config;
pub use error::{Result, WalletError};
