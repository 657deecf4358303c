//! # Shared Utility Functions
//!
//! Common utility functions used by the wallet session core and the web front end.
//!
//! ## Address Formatting
//!
//! Functions for formatting EVM addresses for display:
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`abbreviate_address`] - `format_address` with the header's 6/4 split
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
//! let formatted = format_address(address, 6, 4);
//! assert_eq!(formatted, "0x5B38...ddC4");
//! ```

/// Characters kept at the start of an abbreviated address, `0x` included.
pub const ABBREVIATED_PREFIX_LEN: usize = 6;
/// Characters kept at the end of an abbreviated address.
pub const ABBREVIATED_SUFFIX_LEN: usize = 4;

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Arguments
///
/// * `address` - The wallet address to format
/// * `prefix_len` - Number of characters to show at the start
/// * `suffix_len` - Number of characters to show at the end
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
/// assert_eq!(format_address(addr, 6, 4), "0x5B38...ddC4");
/// assert_eq!(format_address(addr, 4, 4), "0x5B...ddC4");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Guard against individual lengths exceeding address length to prevent panics
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Abbreviate a hex address as `0x1234...abcd` for compact UI display.
///
/// Pure function of its input: the same address always yields the same label.
///
/// # Examples
///
/// ```rust
/// use shared::utils::abbreviate_address;
///
/// let addr = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
/// assert_eq!(abbreviate_address(addr), "0x5B38...ddC4");
/// ```
pub fn abbreviate_address(address: &str) -> String {
    format_address(address, ABBREVIATED_PREFIX_LEN, ABBREVIATED_SUFFIX_LEN)
}
