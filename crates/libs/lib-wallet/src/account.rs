//! Connected account and its display label.

use alloy_primitives::Address;
use shared::utils::abbreviate_address;

/// The account a wallet authorized for this page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    /// ENS primary name, set only after a successful reverse lookup.
    pub eth_name: Option<String>,
    /// `0x1234...abcd`, derived from the checksummed address.
    pub abbreviated_id: String,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            eth_name: None,
            abbreviated_id: abbreviate_address(&address.to_checksum(None)),
        }
    }

    /// EIP-55 checksummed form of the address.
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Label for the header: the ENS name when known, else the abbreviated id.
    pub fn display_name(&self) -> &str {
        self.eth_name.as_deref().unwrap_or(&self.abbreviated_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{addr, ALICE};

    #[test]
    fn test_abbreviated_id_ignores_input_case() {
        let checksummed = Account::new(addr(ALICE));
        let lowercase = Account::new(addr(&ALICE.to_ascii_lowercase()));
        assert_eq!(checksummed, lowercase);
        assert_eq!(checksummed.abbreviated_id, "0x5B38...ddC4");
    }

    #[test]
    fn test_display_name_prefers_ens() {
        let mut account = Account::new(addr(ALICE));
        assert_eq!(account.display_name(), "0x5B38...ddC4");
        account.eth_name = Some("alice.eth".to_string());
        assert_eq!(account.display_name(), "alice.eth");
        assert_eq!(account.checksum_address(), ALICE);
    }
}
