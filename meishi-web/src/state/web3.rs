//! Wallet state management
//!
//! [`Web3Context`] mirrors the [`WalletSession`] state into a signal so
//! components re-render on every change, and forwards the two commands.

use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::config::core_config;
use lib_core::{ChainId, Result, WalletError};
use lib_wallet::{Account, ProviderHandle, SwitchOutcome, WalletSession, WalletSessionState};

use crate::services::InjectedProvider;

/// Global wallet context
#[derive(Clone, Copy)]
pub struct Web3Context {
    pub state: RwSignal<WalletSessionState>,
    session: StoredValue<WalletSession, LocalStorage>,
    target_chain: ChainId,
}

impl Web3Context {
    pub fn account(&self) -> Option<Account> {
        self.state.with(|state| state.account.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|state| state.is_loading)
    }

    pub fn is_target_chain(&self) -> bool {
        self.state.with(|state| state.is_target_chain(self.target_chain))
    }

    pub fn is_metamask_like(&self) -> bool {
        self.state.with(|state| state.is_metamask_like)
    }

    pub fn target_chain(&self) -> ChainId {
        self.target_chain
    }

    pub fn provider(&self) -> Option<ProviderHandle> {
        self.session.try_with_value(WalletSession::provider).flatten()
    }

    pub async fn connect_wallet(self) -> Result<Account> {
        match self.session.try_get_value() {
            Some(session) => session.connect_wallet().await,
            None => Err(WalletError::NoProvider),
        }
    }

    pub async fn switch_chain(self, handle: ProviderHandle) -> Result<SwitchOutcome> {
        match self.session.try_get_value() {
            Some(session) => session.switch_chain(&handle).await,
            None => Ok(SwitchOutcome::Skipped),
        }
    }
}

/// Detect the wallet, start the session and provide it to the component tree.
pub fn provide_web3_context() -> Web3Context {
    let config = core_config().clone();
    let target_chain = config.target_chain_id;
    let provider = InjectedProvider::detect().map(ProviderHandle::new);
    let session = WalletSession::with_ens(provider, config);

    let state = RwSignal::new(session.state());
    let context = Web3Context {
        state,
        session: StoredValue::new_local(session.clone()),
        target_chain,
    };

    let mut updates = session.subscribe();
    spawn_local(async move {
        while updates.changed().await.is_ok() {
            let next = updates.borrow_and_update().clone();
            if state.try_set(next).is_some() {
                break;
            }
        }
    });

    {
        let session = session.clone();
        spawn_local(async move { session.hydrate().await });
    }
    spawn_local(async move { session.run_name_resolution().await });

    on_cleanup(move || {
        context.session.try_with_value(WalletSession::dispose);
    });

    provide_context(context);
    context
}

pub fn use_web3() -> Web3Context {
    expect_context::<Web3Context>()
}
