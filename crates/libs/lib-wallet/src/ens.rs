//! # Name Resolution
//!
//! Best-effort mapping from an address to a human-readable name.
//! [`EnsResolver`] performs an ENS reverse lookup through the wallet's own
//! provider with read-only `eth_call`s, then checks that the name resolves
//! forward to the same address before trusting it.

use alloy_primitives::{address, hex, keccak256, Address, B256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use lib_core::{ChainId, Result, WalletError};

use crate::provider::ProviderHandle;

/// ENS registry, deployed at the same address on every supported network.
pub const ENS_REGISTRY: Address = address!("00000000000c2e074ec69a0dfb2997ba6c7d2e1e");

/// Networks with an ENS registry deployment.
pub const ENS_CHAINS: &[ChainId] = &[ChainId::ETHEREUM, ChainId::SEPOLIA, ChainId::HOLESKY];

sol! {
    function resolver(bytes32 node) external view returns (address);
    function name(bytes32 node) external view returns (string);
    function addr(bytes32 node) external view returns (address);
}

/// Maps an address to an optional display name.
#[async_trait(?Send)]
pub trait NameResolver {
    /// `Ok(None)` means "no name", which is not an error.
    async fn lookup_address(&self, address: Address) -> Result<Option<String>>;
}

/// ENS namehash (EIP-137).
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    for label in name.trim().trim_end_matches('.').rsplit('.') {
        if label.is_empty() {
            continue;
        }
        let label_hash = keccak256(label.as_bytes());
        let mut packed = [0u8; 64];
        packed[..32].copy_from_slice(node.as_slice());
        packed[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(packed);
    }
    node
}

/// `<lowercase hex>.addr.reverse`, the node reverse records live under.
pub fn reverse_name(address: Address) -> String {
    format!("{}.addr.reverse", hex::encode(address.as_slice()))
}

pub struct EnsResolver {
    provider: ProviderHandle,
    registry: Address,
}

impl EnsResolver {
    pub fn new(provider: ProviderHandle) -> Self {
        Self {
            provider,
            registry: ENS_REGISTRY,
        }
    }

    async fn resolver_of(&self, node: B256) -> Result<Address> {
        let output = self
            .provider
            .call(self.registry, &resolverCall { node }.abi_encode())
            .await?;
        resolverCall::abi_decode_returns(&output)
            .map_err(|e| WalletError::Provider(format!("resolver decode failed: {e}")))
    }

    async fn name_of(&self, resolver: Address, node: B256) -> Result<String> {
        let output = self
            .provider
            .call(resolver, &nameCall { node }.abi_encode())
            .await?;
        nameCall::abi_decode_returns(&output)
            .map_err(|e| WalletError::Provider(format!("name decode failed: {e}")))
    }

    async fn addr_of(&self, resolver: Address, node: B256) -> Result<Address> {
        let output = self
            .provider
            .call(resolver, &addrCall { node }.abi_encode())
            .await?;
        addrCall::abi_decode_returns(&output)
            .map_err(|e| WalletError::Provider(format!("addr decode failed: {e}")))
    }
}

#[async_trait(?Send)]
impl NameResolver for EnsResolver {
    async fn lookup_address(&self, address: Address) -> Result<Option<String>> {
        let chain = self.provider.chain_id().await?;
        if !ENS_CHAINS.contains(&chain) {
            tracing::debug!(%chain, "no ENS registry on this chain");
            return Ok(None);
        }

        let reverse_node = namehash(&reverse_name(address));
        let reverse_resolver = self.resolver_of(reverse_node).await?;
        if reverse_resolver.is_zero() {
            return Ok(None);
        }

        let name = self.name_of(reverse_resolver, reverse_node).await?;
        if name.is_empty() {
            return Ok(None);
        }

        // Anyone can set any reverse record; only trust names that point back
        let forward_node = namehash(&name);
        let forward_resolver = self.resolver_of(forward_node).await?;
        if forward_resolver.is_zero() {
            return Ok(None);
        }
        let resolved = self.addr_of(forward_resolver, forward_node).await?;
        if resolved != address {
            tracing::debug!(%address, %name, %resolved, "reverse record does not resolve back");
            return Ok(None);
        }

        Ok(Some(name))
    }
}
