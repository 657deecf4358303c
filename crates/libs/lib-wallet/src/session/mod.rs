//! # Wallet Session
//!
//! [`WalletSession`] is the single source of truth for wallet connectivity.
//! The page reads its [`WalletSessionState`] and calls two commands:
//!
//! - [`connect_wallet`](WalletSession::connect_wallet) - ask the wallet for account access
//! - [`switch_chain`](WalletSession::switch_chain) - ask MetaMask to move to the target chain
//!
//! ## Lifecycle
//!
//! ```text
//! new()            detect provider, subscribe to accountsChanged / chainChanged
//! hydrate()        adopt an already-authorized account and the current chain, silently
//! connect_wallet() is_loading: false -> true -> false, then best-effort ENS lookup
//! dispose()        unsubscribe; later completions no longer touch state
//! ```
//!
//! Provider events are turned into [`Action`]s and applied through the same
//! reducer as command progress, so the state has one writer. Reads after an
//! event never observe the previous value: the action is applied before the
//! provider's `emit` returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use alloy_primitives::Address;
use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;
use lib_core::{ChainId, Config, Result, WalletError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::ens::{EnsResolver, NameResolver};
use crate::provider::{parse_addresses, ProviderEvent, ProviderHandle, Subscription};
use crate::state::{Action, WalletSessionState};


type ConnectFuture = Shared<LocalBoxFuture<'static, Result<Account>>>;

/// What [`WalletSession::switch_chain`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// `wallet_switchEthereumChain` was sent and accepted.
    Requested,
    /// Preconditions not met (foreign handle, or not MetaMask); nothing was sent.
    Skipped,
}

/// Wallet connection state plus the commands that change it.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Rc<Inner>,
}

struct Inner {
    provider: RefCell<Option<ProviderHandle>>,
    resolver: Option<Rc<dyn NameResolver>>,
    config: Config,
    state: watch::Sender<WalletSessionState>,
    in_flight: RefCell<Option<ConnectFuture>>,
    subscription: RefCell<Option<Subscription>>,
    lookup_tx: RefCell<Option<mpsc::UnboundedSender<Address>>>,
    lookup_rx: RefCell<Option<mpsc::UnboundedReceiver<Address>>>,
    /// Current account whose name lookup has already started.
    looked_up: Cell<Option<Address>>,
    disposed: Cell<bool>,
}

impl WalletSession {
    /// Create a session around the provider detected at startup (if any).
    ///
    /// Subscribes to provider events immediately; no request is issued.
    pub fn new(
        provider: Option<ProviderHandle>,
        resolver: Option<Rc<dyn NameResolver>>,
        config: Config,
    ) -> Self {
        let is_metamask_like = provider.as_ref().is_some_and(ProviderHandle::is_metamask);
        let (state, _) = watch::channel(WalletSessionState::detected(is_metamask_like));
        let (lookup_tx, lookup_rx) = mpsc::unbounded_channel();

        info!(
            has_provider = provider.is_some(),
            is_metamask_like,
            target_chain = %config.target_chain_id,
            "wallet session created"
        );

        let inner = Rc::new(Inner {
            provider: RefCell::new(provider.clone()),
            resolver,
            config,
            state,
            in_flight: RefCell::new(None),
            subscription: RefCell::new(None),
            lookup_tx: RefCell::new(Some(lookup_tx)),
            lookup_rx: RefCell::new(Some(lookup_rx)),
            looked_up: Cell::new(None),
            disposed: Cell::new(false),
        });

        if let Some(provider) = provider {
            let session = Rc::downgrade(&inner);
            let subscription = provider.subscribe(Rc::new(move |event| {
                if let Some(inner) = session.upgrade() {
                    inner.handle_event(event);
                }
            }));
            *inner.subscription.borrow_mut() = Some(subscription);
        }

        Self { inner }
    }

    /// Session that resolves names through ENS on the same provider.
    pub fn with_ens(provider: Option<ProviderHandle>, config: Config) -> Self {
        let resolver = provider
            .clone()
            .map(|p| Rc::new(EnsResolver::new(p)) as Rc<dyn NameResolver>);
        Self::new(provider, resolver, config)
    }

    /// Adopt the current chain and an already-authorized account, if any.
    ///
    /// No loading transition: this reads settled facts, it does not prompt.
    /// Failures are logged and leave state untouched.
    pub async fn hydrate(&self) {
        let Ok(provider) = self.inner.live_provider() else {
            debug!("no wallet provider; skipping hydration");
            return;
        };

        match provider.chain_id().await {
            // A chainChanged event during the await is newer than this read
            Ok(chain_id) if self.inner.state.borrow().chain_id.is_none() => {
                self.inner.dispatch(Action::ChainChanged(chain_id));
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not read wallet chain id"),
        }

        match provider.accounts().await {
            Ok(addresses) if self.inner.state.borrow().account.is_none() => {
                if let Some(address) = self.inner.dispatch(Action::AccountsChanged(addresses)) {
                    info!(%address, "adopted already-authorized account");
                    resolve_name(&Rc::downgrade(&self.inner), address).await;
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not read authorized accounts"),
        }
    }

    /// Request account access from the wallet.
    ///
    /// While a request is in flight, further calls join it instead of sending
    /// another `eth_requestAccounts`. Calling it when already connected
    /// re-confirms the current account.
    ///
    /// # Errors
    ///
    /// - [`WalletError::NoProvider`] if no wallet is present (state unchanged)
    /// - [`WalletError::UserRejected`] if the user declined the prompt
    /// - [`WalletError::Provider`] for any other provider failure
    pub async fn connect_wallet(&self) -> Result<Account> {
        let existing = self.inner.in_flight.borrow().clone();
        let pending = match existing {
            Some(pending) => {
                debug!("connect already in flight; joining it");
                pending
            }
            None => {
                let provider = self.inner.live_provider()?;
                let pending = connect_attempt(Rc::downgrade(&self.inner), provider)
                    .boxed_local()
                    .shared();
                *self.inner.in_flight.borrow_mut() = Some(pending.clone());
                pending
            }
        };
        pending.await
    }

    /// Ask the wallet to switch to the configured target chain.
    ///
    /// A no-op returning [`SwitchOutcome::Skipped`] unless `handle` is the
    /// provider detected at startup and it identifies as MetaMask. State is
    /// not touched here: the wallet's `chainChanged` event carries the result.
    ///
    /// # Errors
    ///
    /// - [`WalletError::ChainSwitchRejected`] if the user declined
    /// - [`WalletError::UnknownChain`] if the wallet does not know the target chain
    /// - [`WalletError::NoProvider`] if the provider went away
    pub async fn switch_chain(&self, handle: &ProviderHandle) -> Result<SwitchOutcome> {
        let detected = self.inner.provider.borrow().clone();
        let eligible = detected.is_some_and(|d| d.same_as(handle)) && handle.is_metamask();
        if !eligible {
            debug!("switch_chain skipped: handle is not the detected MetaMask provider");
            return Ok(SwitchOutcome::Skipped);
        }
        if !handle.is_available() {
            return Err(WalletError::NoProvider);
        }

        let target = self.inner.config.target_chain_id;
        info!(%target, "requesting chain switch");
        handle.switch_chain(target).await.inspect_err(|e| {
            warn!(code = e.code(), error = %e, "chain switch failed");
        })?;
        Ok(SwitchOutcome::Requested)
    }

    /// Resolve names queued by `accountsChanged` until the session is disposed.
    ///
    /// Meant to be spawned once by the host. A second concurrent driver returns immediately.
    pub async fn run_name_resolution(&self) {
        let Some(mut queue) = self.inner.lookup_rx.borrow_mut().take() else {
            debug!("name resolution is already being driven");
            return;
        };
        let session = Rc::downgrade(&self.inner);
        while let Some(address) = queue.recv().await {
            if self.inner.needs_lookup(address) {
                resolve_name(&session, address).await;
            }
        }
        debug!("name resolution queue closed");
    }

    /// Resolve whatever lookups are queued right now, then return.
    pub async fn flush_name_lookups(&self) {
        let Some(mut queue) = self.inner.lookup_rx.borrow_mut().take() else {
            return;
        };
        let session = Rc::downgrade(&self.inner);
        while let Ok(address) = queue.try_recv() {
            if self.inner.needs_lookup(address) {
                resolve_name(&session, address).await;
            }
        }
        *self.inner.lookup_rx.borrow_mut() = Some(queue);
    }

    /// Release the provider subscription and stop applying state updates.
    ///
    /// Idempotent. In-flight requests still run to completion but their
    /// results are discarded.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        drop(self.inner.subscription.borrow_mut().take());
        drop(self.inner.lookup_tx.borrow_mut().take());
        drop(self.inner.in_flight.borrow_mut().take());
        drop(self.inner.provider.borrow_mut().take());
        info!("wallet session disposed");
    }

    /// Current state snapshot.
    pub fn state(&self) -> WalletSessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<WalletSessionState> {
        self.inner.state.subscribe()
    }

    pub fn account(&self) -> Option<Account> {
        self.inner.state.borrow().account.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn is_metamask_like(&self) -> bool {
        self.inner.state.borrow().is_metamask_like
    }

    /// Whether the wallet reports the target chain. Computed on every call.
    pub fn is_target_chain(&self) -> bool {
        self.inner
            .state
            .borrow()
            .is_target_chain(self.inner.config.target_chain_id)
    }

    pub fn target_chain(&self) -> ChainId {
        self.inner.config.target_chain_id
    }

    /// The provider detected at startup; `None` if absent or disposed.
    pub fn provider(&self) -> Option<ProviderHandle> {
        self.inner.provider.borrow().clone()
    }
}

impl Inner {
    fn live_provider(&self) -> Result<ProviderHandle> {
        let provider = self.provider.borrow().clone().ok_or(WalletError::NoProvider)?;
        if !provider.is_available() {
            warn!("wallet provider is no longer available");
            return Err(WalletError::NoProvider);
        }
        Ok(provider)
    }

    /// Whether a queued lookup for `address` still needs to run.
    fn needs_lookup(&self, address: Address) -> bool {
        self.is_current(address) && self.looked_up.get() != Some(address)
    }

    fn is_current(&self, address: Address) -> bool {
        self.state
            .borrow()
            .account
            .as_ref()
            .is_some_and(|a| a.address == address)
    }

    /// Apply `action` and notify observers if anything changed.
    fn dispatch(&self, action: Action) -> Option<Address> {
        if self.disposed.get() {
            debug!(?action, "session disposed; dropping state update");
            return None;
        }
        let mut lookup = None;
        self.state.send_if_modified(|state| {
            let before = state.clone();
            lookup = state.apply(action);
            *state != before
        });
        if lookup.is_some() || self.state.borrow().account.is_none() {
            self.looked_up.set(None);
        }
        lookup
    }

    fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(raw) => match parse_addresses(&raw) {
                Ok(addresses) => {
                    debug!(count = addresses.len(), "accountsChanged");
                    if let Some(address) = self.dispatch(Action::AccountsChanged(addresses)) {
                        self.queue_lookup(address);
                    }
                }
                Err(e) => warn!(error = %e, "ignoring malformed accountsChanged payload"),
            },
            ProviderEvent::ChainChanged(raw) => match ChainId::parse(&raw) {
                Ok(chain_id) => {
                    debug!(%chain_id, "chainChanged");
                    self.dispatch(Action::ChainChanged(chain_id));
                }
                Err(e) => warn!(error = %e, "ignoring malformed chainChanged payload"),
            },
        }
    }

    fn queue_lookup(&self, address: Address) {
        if self.resolver.is_none() {
            return;
        }
        if let Some(queue) = self.lookup_tx.borrow().as_ref() {
            // Closed only after dispose, when lookups no longer matter
            let _ = queue.send(address);
        }
    }
}

fn dispatch_to(session: &Weak<Inner>, action: Action) {
    if let Some(inner) = session.upgrade() {
        inner.dispatch(action);
    }
}

async fn connect_attempt(session: Weak<Inner>, provider: ProviderHandle) -> Result<Account> {
    dispatch_to(&session, Action::ConnectStarted);
    info!("requesting wallet accounts");

    let outcome = provider.request_accounts().await.and_then(|addresses| {
        match addresses.first().copied() {
            Some(address) => Ok((address, addresses)),
            None => Err(WalletError::Provider("wallet returned no accounts".to_string())),
        }
    });

    let result = match outcome {
        Ok((address, addresses)) => {
            dispatch_to(&session, Action::ConnectSucceeded(addresses));
            info!(%address, "wallet connected");
            let mut account = Account::new(address);
            account.eth_name = resolve_name(&session, address).await;
            Ok(account)
        }
        Err(e) => {
            dispatch_to(&session, Action::ConnectFailed);
            warn!(code = e.code(), error = %e, "wallet connection failed");
            Err(e)
        }
    };

    if let Some(inner) = session.upgrade() {
        inner.in_flight.borrow_mut().take();
    }
    result
}

/// Best-effort lookup; failures are logged and treated as "no name".
async fn resolve_name(session: &Weak<Inner>, address: Address) -> Option<String> {
    let resolver = {
        let inner = session.upgrade()?;
        let resolver = inner.resolver.clone()?;
        inner.looked_up.set(Some(address));
        resolver
    };
    let name = match resolver.lookup_address(address).await {
        Ok(name) => name,
        Err(e) => {
            debug!(%address, error = %e, "name resolution failed");
            None
        }
    };
    if let Some(name) = &name {
        debug!(%address, %name, "resolved account name");
    }
    dispatch_to(
        session,
        Action::NameResolved {
            address,
            name: name.clone(),
        },
    );
    name
}
