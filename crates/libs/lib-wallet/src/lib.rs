//! # Wallet Session
//!
//! Connection state for a browser-injected EVM wallet: whether a provider is
//! present, which account it authorized, what that account is called on ENS,
//! and whether the wallet sits on the page's target chain.
//!
//! ## Modules
//!
//! - [`provider`] - the [`Eip1193Provider`] seam and the [`ProviderHandle`] wrapper
//! - [`account`] - [`Account`] with its display label
//! - [`state`] - [`WalletSessionState`] and the single reducer that mutates it
//! - [`session`] - [`WalletSession`]: the two commands, event handling, teardown
//! - [`ens`] - best-effort reverse name resolution
//!
//! Everything here is single-threaded: handles are `Rc`, async traits are `?Send`.

pub mod account;
pub mod ens;
pub mod provider;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use account::Account;
pub use ens::{EnsResolver, NameResolver};
pub use provider::{Eip1193Provider, EventListener, ListenerId, ProviderEvent, ProviderHandle, Subscription};
pub use session::{SwitchOutcome, WalletSession};
pub use state::{Action, WalletSessionState};
