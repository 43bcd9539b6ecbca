//! Dotted-decimal IPv4 codec.

use thiserror::Error;

/// Error returned when a string is not a well-formed dotted-decimal IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address could not be parsed.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected input
        address: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl AddressError {
    fn invalid(address: &str, reason: &'static str) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason,
        }
    }
}

/// Parses a dotted-decimal IPv4 address into its four octets.
///
/// Exactly four dot-separated decimal octets in `0..=255` are accepted.
/// Leading zeros are tolerated (`010` is ten), signs and whitespace are not.
fn parse_octets(address: &str) -> Result<[u8; 4], AddressError> {
    let mut octets = [0u8; 4];
    let mut parts = address.split('.');

    for octet in &mut octets {
        let part = parts
            .next()
            .ok_or_else(|| AddressError::invalid(address, "expected 4 octets"))?;

        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::invalid(address, "octet is not a decimal number"));
        }

        *octet = part
            .parse::<u8>()
            .map_err(|_| AddressError::invalid(address, "octet out of range 0-255"))?;
    }

    if parts.next().is_some() {
        return Err(AddressError::invalid(address, "expected 4 octets"));
    }

    Ok(octets)
}

/// Packs a dotted-decimal IPv4 address into a big-endian `u32`.
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] if the input is not exactly four
/// decimal octets in `0..=255`.
///
/// # Example
///
/// ```
/// use ip_rotate::address::encode;
///
/// assert_eq!(encode("192.168.1.1").unwrap(), 0xC0A8_0101);
/// assert!(encode("999.1.1.1").is_err());
/// ```
pub fn encode(address: &str) -> Result<u32, AddressError> {
    parse_octets(address).map(u32::from_be_bytes)
}

/// Unpacks a big-endian `u32` into dotted-decimal form.
#[must_use]
pub fn decode(value: u32) -> String {
    let [a, b, c, d] = value.to_be_bytes();
    format!("{a}.{b}.{c}.{d}")
}
