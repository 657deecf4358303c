//! # Provider Seam
//!
//! [`Eip1193Provider`] is the minimal surface of an injected wallet the session
//! relies on. The browser binding lives in the web crate; tests substitute an
//! in-memory provider.
//!
//! [`ProviderHandle`] wraps a shared provider and adds typed helpers for the
//! handful of RPC methods the session issues. Two handles are "the same" when
//! they point at the same provider object.

use std::rc::Rc;
use std::str::FromStr;

use alloy_primitives::{hex, Address};
use async_trait::async_trait;
use lib_core::{ChainId, Result, WalletError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::dto::rpc::{methods, CallRequest, ProviderRpcError, RequestArguments, SwitchEthereumChainParameter};

/// Event emitted by the provider, carrying the raw payload it delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New list of authorized accounts; empty means the user disconnected.
    AccountsChanged(Vec<String>),
    /// New active chain as a hex quantity.
    ChainChanged(String),
}

pub type EventListener = Rc<dyn Fn(ProviderEvent)>;

/// Token returned by [`Eip1193Provider::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Trait for browser-injected wallet providers
#[async_trait(?Send)]
pub trait Eip1193Provider {
    /// Whether the provider self-identifies as MetaMask (`ethereum.isMetaMask`).
    fn is_metamask(&self) -> bool;

    /// Whether the provider is still reachable. Extensions can be disabled mid-session.
    fn is_available(&self) -> bool {
        true
    }

    /// `ethereum.request(args)`.
    async fn request(&self, args: RequestArguments) -> std::result::Result<Value, ProviderRpcError>;

    /// Register a listener for `accountsChanged` and `chainChanged`.
    fn on(&self, listener: EventListener) -> ListenerId;

    /// Unregister a listener previously returned by [`on`](Eip1193Provider::on).
    fn remove_listener(&self, id: ListenerId);
}

/// Shared reference to the provider detected at startup.
#[derive(Clone)]
pub struct ProviderHandle {
    inner: Rc<dyn Eip1193Provider>,
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("is_metamask", &self.inner.is_metamask())
            .finish()
    }
}

impl ProviderHandle {
    pub fn new<P: Eip1193Provider + 'static>(provider: P) -> Self {
        Self {
            inner: Rc::new(provider),
        }
    }

    pub fn from_rc(inner: Rc<dyn Eip1193Provider>) -> Self {
        Self { inner }
    }

    /// Identity comparison: both handles wrap the same provider object.
    pub fn same_as(&self, other: &ProviderHandle) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }

    pub fn is_metamask(&self) -> bool {
        self.inner.is_metamask()
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    /// Subscribe `listener` until the returned guard is dropped.
    pub fn subscribe(&self, listener: EventListener) -> Subscription {
        let id = self.inner.on(listener);
        tracing::debug!(listener = id.0, "subscribed to provider events");
        Subscription {
            provider: self.clone(),
            id,
        }
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        args: RequestArguments,
        map_err: impl FnOnce(ProviderRpcError) -> WalletError,
    ) -> Result<T> {
        let value = self.inner.request(args).await.map_err(map_err)?;
        Ok(serde_json::from_value(value)?)
    }

    /// `eth_requestAccounts`: prompts the user if the origin is not yet authorized.
    pub async fn request_accounts(&self) -> Result<Vec<Address>> {
        let raw: Vec<String> = self
            .request_as(
                RequestArguments::new(methods::REQUEST_ACCOUNTS),
                WalletError::from_connect_rpc,
            )
            .await?;
        parse_addresses(&raw)
    }

    /// `eth_accounts`: accounts already authorized, never prompts.
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        let raw: Vec<String> = self
            .request_as(RequestArguments::new(methods::ACCOUNTS), WalletError::from_connect_rpc)
            .await?;
        parse_addresses(&raw)
    }

    pub async fn chain_id(&self) -> Result<ChainId> {
        self.request_as(RequestArguments::new(methods::CHAIN_ID), WalletError::from_rpc)
            .await
    }

    /// `wallet_switchEthereumChain` to `target`.
    pub async fn switch_chain(&self, target: ChainId) -> Result<()> {
        let args = RequestArguments::with_params(
            methods::SWITCH_CHAIN,
            json!([SwitchEthereumChainParameter::new(target.to_hex())]),
        );
        self.inner
            .request(args)
            .await
            .map_err(|e| WalletError::from_switch_rpc(e, target))?;
        Ok(())
    }

    /// Read-only `eth_call` against the latest block.
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>> {
        let call = CallRequest {
            to: hex::encode_prefixed(to.as_slice()),
            data: hex::encode_prefixed(data),
        };
        let args = RequestArguments::with_params(methods::CALL, json!([call, "latest"]));
        let output: String = self.request_as(args, WalletError::from_rpc).await?;
        hex::decode(&output)
            .map_err(|e| WalletError::Provider(format!("eth_call returned invalid hex: {e}")))
    }
}

/// Listener registration that is removed from the provider on drop.
pub struct Subscription {
    provider: ProviderHandle,
    id: ListenerId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.provider.inner.remove_listener(self.id);
        tracing::debug!(listener = self.id.0, "unsubscribed from provider events");
    }
}

/// Parse provider account strings (checksummed or lowercase hex).
pub fn parse_addresses(raw: &[String]) -> Result<Vec<Address>> {
    raw.iter()
        .map(|s| {
            Address::from_str(s.trim())
                .map_err(|e| WalletError::Provider(format!("invalid account address {s:?}: {e}")))
        })
        .collect()
}
