//! In-memory stand-ins for the injected provider and the name service.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::{hex, Address};
use async_trait::async_trait;
use lib_core::WalletError;
use serde_json::{json, Value};
use shared::dto::rpc::{codes, methods, ProviderRpcError, RequestArguments};
use tokio::sync::Notify;

use crate::ens::NameResolver;
use crate::provider::{Eip1193Provider, EventListener, ListenerId, ProviderEvent};

pub const ALICE: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
pub const BOB: &str = "0xAb8483F64d9C6d1EcF9b849Ae677dD3315835cb2";

pub fn addr(raw: &str) -> Address {
    raw.parse().unwrap()
}

pub struct MockProvider {
    metamask: bool,
    available: Cell<bool>,
    authorized: RefCell<Vec<String>>,
    connect_reply: RefCell<Result<Vec<String>, ProviderRpcError>>,
    switch_reply: RefCell<Result<(), ProviderRpcError>>,
    chain_id: RefCell<String>,
    gate: RefCell<Option<Rc<Notify>>>,
    eth_calls: RefCell<HashMap<(String, String), String>>,
    requests: RefCell<Vec<RequestArguments>>,
    listeners: RefCell<Vec<(ListenerId, EventListener)>>,
    next_listener: Cell<u64>,
}

impl MockProvider {
    fn with_flag(metamask: bool) -> Self {
        Self {
            metamask,
            available: Cell::new(true),
            authorized: RefCell::new(Vec::new()),
            connect_reply: RefCell::new(Ok(vec![ALICE.to_string()])),
            switch_reply: RefCell::new(Ok(())),
            chain_id: RefCell::new("0x1".to_string()),
            gate: RefCell::new(None),
            eth_calls: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    pub fn metamask() -> Self {
        Self::with_flag(true)
    }

    pub fn generic() -> Self {
        Self::with_flag(false)
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn set_authorized(&self, accounts: &[&str]) {
        *self.authorized.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn reply_to_connect(&self, reply: Result<Vec<String>, ProviderRpcError>) {
        *self.connect_reply.borrow_mut() = reply;
    }

    pub fn reply_to_switch(&self, reply: Result<(), ProviderRpcError>) {
        *self.switch_reply.borrow_mut() = reply;
    }

    pub fn set_chain(&self, hex_chain: &str) {
        *self.chain_id.borrow_mut() = hex_chain.to_string();
    }

    /// Hold `eth_requestAccounts` until the returned `Notify` is signalled.
    pub fn gate_connect(&self) -> Rc<Notify> {
        let notify = Rc::new(Notify::new());
        *self.gate.borrow_mut() = Some(Rc::clone(&notify));
        notify
    }

    pub fn stub_call(&self, to: Address, data: &[u8], output: &[u8]) {
        self.eth_calls.borrow_mut().insert(
            (hex::encode_prefixed(to.as_slice()), hex::encode_prefixed(data)),
            hex::encode_prefixed(output),
        );
    }

    pub fn requests(&self, method: &str) -> Vec<RequestArguments> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn emit(&self, event: ProviderEvent) {
        let listeners: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(event.clone());
        }
    }

    fn answer_call(&self, params: Option<&Value>) -> Result<Value, ProviderRpcError> {
        let call = params
            .and_then(|p| p.get(0))
            .ok_or_else(|| ProviderRpcError::new(-32602, "missing call object"))?;
        let to = call["to"].as_str().unwrap_or_default().to_ascii_lowercase();
        let data = call["data"].as_str().unwrap_or_default().to_ascii_lowercase();
        let output = self
            .eth_calls
            .borrow()
            .get(&(to, data))
            .cloned()
            .unwrap_or_else(|| "0x".to_string());
        Ok(json!(output))
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for MockProvider {
    fn is_metamask(&self) -> bool {
        self.metamask
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        self.requests.borrow_mut().push(args.clone());
        match args.method.as_str() {
            methods::REQUEST_ACCOUNTS => {
                let gate = self.gate.borrow().clone();
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                let reply = self.connect_reply.borrow().clone()?;
                Ok(json!(reply))
            }
            methods::ACCOUNTS => Ok(json!(self.authorized.borrow().clone())),
            methods::CHAIN_ID => Ok(json!(self.chain_id.borrow().clone())),
            methods::SWITCH_CHAIN => {
                self.switch_reply.borrow().clone()?;
                Ok(Value::Null)
            }
            methods::CALL => self.answer_call(args.params.as_ref()),
            other => Err(ProviderRpcError::new(
                codes::UNSUPPORTED_METHOD,
                format!("unsupported method {other}"),
            )),
        }
    }

    fn on(&self, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Name service backed by a fixed table.
#[derive(Default)]
pub struct StaticResolver {
    names: HashMap<Address, String>,
    fail: bool,
    lookups: Cell<usize>,
    gate: RefCell<Option<Rc<Notify>>>,
}

impl StaticResolver {
    pub fn with_name(address: &str, name: &str) -> Self {
        let mut names = HashMap::new();
        names.insert(addr(address), name.to_string());
        Self {
            names,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    /// Hold every lookup until the returned `Notify` is signalled.
    pub fn gate(&self) -> Rc<Notify> {
        let notify = Rc::new(Notify::new());
        *self.gate.borrow_mut() = Some(Rc::clone(&notify));
        notify
    }
}

#[async_trait(?Send)]
impl NameResolver for StaticResolver {
    async fn lookup_address(&self, address: Address) -> Result<Option<String>, WalletError> {
        self.lookups.set(self.lookups.get() + 1);
        let gate = self.gate.borrow().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(WalletError::Provider("name service unreachable".to_string()));
        }
        Ok(self.names.get(&address).cloned())
    }
}
