//! # Chain Identifiers
//!
//! [`ChainId`] is the numeric network id a provider reports. Providers speak
//! hex quantities (`"0x89"`), humans and config files usually speak decimal
//! (`137`), so parsing accepts both and [`ChainId::to_hex`] produces the form
//! `wallet_switchEthereumChain` expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WalletError;

/// Numeric identifier of an EVM network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(u64);

impl ChainId {
    pub const ETHEREUM: ChainId = ChainId(1);
    pub const POLYGON: ChainId = ChainId(137);
    pub const SEPOLIA: ChainId = ChainId(11_155_111);
    pub const HOLESKY: ChainId = ChainId(17_000);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Human-readable network name for the chains this app knows about.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::ETHEREUM => Some("Ethereum"),
            Self::POLYGON => Some("Polygon"),
            Self::SEPOLIA => Some("Sepolia"),
            Self::HOLESKY => Some("Holesky"),
            _ => None,
        }
    }

    /// Hex quantity encoding: lowercase, `0x` prefixed, no leading zeros.
    ///
    /// ```rust
    /// use lib_core::ChainId;
    ///
    /// assert_eq!(ChainId::new(137).to_hex(), "0x89");
    /// assert_eq!(ChainId::new(1).to_hex(), "0x1");
    /// ```
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse a hex quantity (`0x89`) or a decimal string (`137`).
    pub fn parse(value: &str) -> Result<Self, WalletError> {
        let trimmed = value.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|e| WalletError::Provider(format!("invalid chain id {trimmed:?}: {e}")))
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ChainId {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older providers report numbers, current ones hex strings
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ChainId(n)),
            Raw::Text(s) => ChainId::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_has_no_leading_zeros() {
        assert_eq!(ChainId::new(137).to_hex(), "0x89");
        assert_eq!(ChainId::new(16).to_hex(), "0x10");
        assert_eq!(ChainId::new(0).to_hex(), "0x0");
        assert_eq!(ChainId::SEPOLIA.to_hex(), "0xaa36a7");
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!(ChainId::parse("0x89").unwrap(), ChainId::POLYGON);
        assert_eq!(ChainId::parse("0X89").unwrap(), ChainId::POLYGON);
        assert_eq!(ChainId::parse("137").unwrap(), ChainId::POLYGON);
        assert_eq!(" 0x1 ".parse::<ChainId>().unwrap(), ChainId::ETHEREUM);
    }

    #[test]
    fn test_known_names() {
        assert_eq!(ChainId::POLYGON.name(), Some("Polygon"));
        assert_eq!(ChainId::new(10).name(), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ChainId::parse("0xzz").is_err());
        assert!(ChainId::parse("polygon").is_err());
        assert!(ChainId::parse("").is_err());
    }

    #[test]
    fn test_serde_accepts_number_or_hex() {
        let from_hex: ChainId = serde_json::from_str("\"0x89\"").unwrap();
        let from_num: ChainId = serde_json::from_str("137").unwrap();
        assert_eq!(from_hex, from_num);
        assert_eq!(serde_json::to_string(&from_hex).unwrap(), "\"0x89\"");
    }
}
