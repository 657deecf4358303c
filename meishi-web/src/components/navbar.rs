//! Header bar with the wallet widgets.

use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::{ChainId, WalletError};
use lib_wallet::WalletSessionState;

use crate::state::web3::use_web3;

const METAMASK_DOWNLOAD_URL: &str = "https://metamask.io/download/";

#[component]
pub fn Navbar() -> impl IntoView {
    view! {
        <nav>
            <div class="nav-inner">
                <span class="nav-title">"meishi"</span>
                <div class="nav-wallet">
                    <ChainState/>
                    <AccountWithAuth/>
                </div>
            </div>
        </nav>
    }
}

/// Connect button, or the connected account's label.
#[component]
fn AccountWithAuth() -> impl IntoView {
    let web3 = use_web3();
    let error = RwSignal::new(None::<WalletError>);

    let connect = move |_| {
        error.set(None);
        spawn_local(async move {
            if let Err(e) = web3.connect_wallet().await {
                log::warn!("connect failed: {e}");
                error.set(Some(e));
            }
        });
    };

    view! {
        <div class="account">
            {move || match web3.account() {
                Some(account) => {
                    view! {
                        <span class="account-id" title=account.checksum_address()>
                            {account.display_name().to_string()}
                        </span>
                    }
                        .into_any()
                }
                None => {
                    view! {
                        <button class="btn" on:click=connect disabled=move || web3.is_loading()>
                            {move || if web3.is_loading() { "Connecting..." } else { "Connect wallet" }}
                        </button>
                    }
                        .into_any()
                }
            }}
            {move || {
                error
                    .get()
                    .map(|e| {
                        view! {
                            <p class="wallet-error">
                                {e.user_message()}
                                {e.needs_install().then(|| view! {
                                    " "
                                    <a href=METAMASK_DOWNLOAD_URL target="_blank" rel="noopener">
                                        "Get MetaMask"
                                    </a>
                                })}
                            </p>
                        }
                    })
            }}
        </div>
    }
}

/// Shown whenever the wallet is not on the target chain, connected or not.
fn shows_wrong_network(state: &WalletSessionState, target: ChainId) -> bool {
    !state.is_target_chain(target)
}

/// Only MetaMask understands the switch request.
fn offers_switch(state: &WalletSessionState, has_provider: bool) -> bool {
    state.is_metamask_like && has_provider
}

/// Wrong-network warning with a switch button for MetaMask.
#[component]
fn ChainState() -> impl IntoView {
    let web3 = use_web3();
    let target = web3.target_chain();
    let target_label = target
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("chain {target}"));

    let switch = move |_| {
        let Some(handle) = web3.provider() else {
            return;
        };
        spawn_local(async move {
            match web3.switch_chain(handle).await {
                Ok(outcome) => log::debug!("switch_chain: {outcome:?}"),
                Err(e) => log::warn!("switch_chain failed: {e}"),
            }
        });
    };

    view! {
        <Show when=move || web3.state.with(|state| shows_wrong_network(state, target))>
            <div class="chain-warning">
                <span>{format!("Wrong network. Switch to {target_label}.")}</span>
                <Show when=move || {
                    let has_provider = web3.provider().is_some();
                    web3.state.with(|state| offers_switch(state, has_provider))
                }>
                    <button class="btn btn-small" on:click=switch>
                        "Switch network"
                    </button>
                </Show>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_network_shown_before_connect() {
        let target = ChainId::POLYGON;
        let mut state = WalletSessionState::detected(true);
        assert!(state.account.is_none());
        assert!(shows_wrong_network(&state, target));

        state.chain_id = Some(ChainId::ETHEREUM);
        assert!(shows_wrong_network(&state, target));

        state.chain_id = Some(target);
        assert!(!shows_wrong_network(&state, target));
    }

    #[test]
    fn test_switch_offered_only_to_metamask_with_provider() {
        assert!(offers_switch(&WalletSessionState::detected(true), true));
        assert!(!offers_switch(&WalletSessionState::detected(true), false));
        assert!(!offers_switch(&WalletSessionState::detected(false), true));
    }
}
