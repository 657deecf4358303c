//! # Session State
//!
//! [`WalletSessionState`] is what the page renders from. It changes only
//! through [`WalletSessionState::apply`], which the session calls for its own
//! command progress and for every provider event, so there is exactly one
//! writer no matter where a change originates.

use alloy_primitives::Address;
use lib_core::ChainId;

use crate::account::Account;

/// Snapshot of wallet connectivity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSessionState {
    pub account: Option<Account>,
    /// Absent until the provider first reports a chain.
    pub chain_id: Option<ChainId>,
    /// True only while an account-access request is in flight.
    pub is_loading: bool,
    pub is_metamask_like: bool,
}

/// A single state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConnectStarted,
    ConnectSucceeded(Vec<Address>),
    ConnectFailed,
    /// Provider-reported account list (`accountsChanged` or `eth_accounts`).
    AccountsChanged(Vec<Address>),
    NameResolved {
        address: Address,
        name: Option<String>,
    },
    ChainChanged(ChainId),
}

impl WalletSessionState {
    /// Initial state once provider detection has run.
    pub fn detected(is_metamask_like: bool) -> Self {
        Self {
            is_metamask_like,
            ..Default::default()
        }
    }

    pub fn is_target_chain(&self, target: ChainId) -> bool {
        self.chain_id == Some(target)
    }

    /// Apply `action` in place.
    ///
    /// Returns the address whose name should be looked up when a different
    /// account became current.
    pub fn apply(&mut self, action: Action) -> Option<Address> {
        match action {
            Action::ConnectStarted => {
                self.is_loading = true;
                None
            }
            Action::ConnectFailed => {
                self.is_loading = false;
                None
            }
            Action::ConnectSucceeded(addresses) => {
                self.is_loading = false;
                self.replace_account(addresses.first().copied())
            }
            Action::AccountsChanged(addresses) => self.replace_account(addresses.first().copied()),
            Action::NameResolved { address, name } => {
                // Stale lookups for an account that is no longer current are dropped
                if let Some(account) = self.account.as_mut().filter(|a| a.address == address) {
                    account.eth_name = name;
                }
                None
            }
            Action::ChainChanged(chain_id) => {
                self.chain_id = Some(chain_id);
                None
            }
        }
    }

    fn replace_account(&mut self, next: Option<Address>) -> Option<Address> {
        match next {
            None => {
                self.account = None;
                None
            }
            Some(address) if self.account.as_ref().is_some_and(|a| a.address == address) => None,
            Some(address) => {
                self.account = Some(Account::new(address));
                Some(address)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{addr, ALICE, BOB};

    #[test]
    fn test_is_target_chain() {
        let target = ChainId::POLYGON;
        let mut state = WalletSessionState::default();
        assert!(!state.is_target_chain(target));

        state.apply(Action::ChainChanged(ChainId::ETHEREUM));
        assert!(!state.is_target_chain(target));

        state.apply(Action::ChainChanged(target));
        assert!(state.is_target_chain(target));
    }

    #[test]
    fn test_connect_cycle_toggles_loading() {
        let mut state = WalletSessionState::detected(true);
        state.apply(Action::ConnectStarted);
        assert!(state.is_loading);
        assert!(state.account.is_none());

        let lookup = state.apply(Action::ConnectSucceeded(vec![addr(ALICE)]));
        assert_eq!(lookup, Some(addr(ALICE)));
        assert!(!state.is_loading);
        assert!(state.account.is_some());
        assert!(state.is_metamask_like);
    }

    #[test]
    fn test_connect_failed_keeps_account_absent() {
        let mut state = WalletSessionState::default();
        state.apply(Action::ConnectStarted);
        state.apply(Action::ConnectFailed);
        assert_eq!(state, WalletSessionState::default());
    }

    #[test]
    fn test_empty_account_list_disconnects() {
        let mut state = WalletSessionState::default();
        state.apply(Action::AccountsChanged(vec![addr(ALICE)]));
        assert!(state.account.is_some());
        assert_eq!(state.apply(Action::AccountsChanged(vec![])), None);
        assert!(state.account.is_none());
    }

    #[test]
    fn test_same_account_keeps_name() {
        let mut state = WalletSessionState::default();
        state.apply(Action::AccountsChanged(vec![addr(ALICE)]));
        state.apply(Action::NameResolved {
            address: addr(ALICE),
            name: Some("alice.eth".to_string()),
        });

        assert_eq!(state.apply(Action::AccountsChanged(vec![addr(ALICE)])), None);
        assert_eq!(state.account.unwrap().eth_name.as_deref(), Some("alice.eth"));
    }

    #[test]
    fn test_stale_name_is_dropped() {
        let mut state = WalletSessionState::default();
        state.apply(Action::AccountsChanged(vec![addr(ALICE)]));
        state.apply(Action::AccountsChanged(vec![addr(BOB)]));
        state.apply(Action::NameResolved {
            address: addr(ALICE),
            name: Some("alice.eth".to_string()),
        });

        let account = state.account.unwrap();
        assert_eq!(account.address, addr(BOB));
        assert_eq!(account.eth_name, None);
    }
}
