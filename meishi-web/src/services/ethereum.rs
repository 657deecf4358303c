//! EIP-1193 Binding for the Injected Wallet
//!
//! Wraps the object a browser wallet extension places at `window.ethereum`
//! so the wallet session can drive it through [`Eip1193Provider`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use lib_wallet::{Eip1193Provider, EventListener, ListenerId, ProviderEvent};
use serde::Serialize;
use serde_json::Value;
use shared::dto::rpc::{codes, events, ProviderRpcError, RequestArguments};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "
export function injectedEthereum() {
    const eth = window.ethereum;
    if (!eth || typeof eth.request !== 'function') {
        return null;
    }
    return eth;
}
")]
extern "C" {
    /// `window.ethereum` if it looks like an EIP-1193 provider
    fn injectedEthereum() -> Option<JsValue>;
}

type JsListener = Closure<dyn Fn(JsValue)>;

/// The wallet provider injected into the page.
pub struct InjectedProvider {
    ethereum: JsValue,
    is_metamask: bool,
    listeners: RefCell<HashMap<u64, Vec<(&'static str, JsListener)>>>,
    next_listener: Cell<u64>,
}

impl InjectedProvider {
    /// Look for an injected provider. Never prompts the user.
    pub fn detect() -> Option<Self> {
        let Some(ethereum) = injectedEthereum() else {
            log::info!("no injected wallet provider found");
            return None;
        };
        let is_metamask = Reflect::get(&ethereum, &JsValue::from_str("isMetaMask"))
            .ok()
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false);
        log::info!("injected wallet provider found (isMetaMask: {is_metamask})");

        Some(Self {
            ethereum,
            is_metamask,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        })
    }

    fn method(&self, name: &str) -> Result<Function, JsValue> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))?.dyn_into::<Function>()
    }

    fn call_listener_method(&self, name: &str, event: &str, listener: &JsListener) {
        let outcome = self
            .method(name)
            .and_then(|f| f.call2(&self.ethereum, &JsValue::from_str(event), listener.as_ref()));
        if let Err(e) = outcome {
            log::warn!("ethereum.{name}({event}) failed: {e:?}");
        }
    }
}

/// Convert a rejected `request()` promise into an RPC error.
fn rpc_error(err: JsValue) -> ProviderRpcError {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code")
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
        .unwrap_or(codes::INTERNAL_ERROR);
    let message = field("message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    let mut error = ProviderRpcError::new(code, message);
    error.data = field("data")
        .filter(|d| !d.is_undefined())
        .and_then(|d| serde_wasm_bindgen::from_value(d).ok());
    error
}

fn internal_error(message: impl Into<String>) -> ProviderRpcError {
    ProviderRpcError::new(codes::INTERNAL_ERROR, message)
}

#[async_trait(?Send)]
impl Eip1193Provider for InjectedProvider {
    fn is_metamask(&self) -> bool {
        self.is_metamask
    }

    fn is_available(&self) -> bool {
        injectedEthereum().is_some_and(|current| current == self.ethereum)
    }

    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        // Plain objects, not ES Maps: wallets read params with property access
        let js_args = args
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| internal_error(format!("could not encode request: {e}")))?;

        let promise = self
            .method("request")
            .and_then(|f| f.call1(&self.ethereum, &js_args))
            .map_err(rpc_error)?
            .dyn_into::<Promise>()
            .map_err(|_| internal_error("ethereum.request did not return a promise"))?;

        let result = JsFuture::from(promise).await.map_err(rpc_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| internal_error(format!("could not decode {} result: {e}", args.method)))
    }

    fn on(&self, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let on_accounts: JsListener = {
            let listener = Rc::clone(&listener);
            Closure::new(move |value: JsValue| {
                match serde_wasm_bindgen::from_value::<Vec<String>>(value) {
                    Ok(accounts) => listener(ProviderEvent::AccountsChanged(accounts)),
                    Err(e) => log::warn!("ignoring accountsChanged payload: {e}"),
                }
            })
        };
        let on_chain: JsListener = Closure::new(move |value: JsValue| match value.as_string() {
            Some(chain_id) => listener(ProviderEvent::ChainChanged(chain_id)),
            None => log::warn!("ignoring chainChanged payload: {value:?}"),
        });

        let registered = vec![
            (events::ACCOUNTS_CHANGED, on_accounts),
            (events::CHAIN_CHANGED, on_chain),
        ];
        for (event, closure) in &registered {
            self.call_listener_method("on", event, closure);
        }
        self.listeners.borrow_mut().insert(id.0, registered);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(registered) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        for (event, closure) in &registered {
            self.call_listener_method("removeListener", event, closure);
        }
    }
}
