//! IPv4 address arithmetic and generation.
//!
//! This module provides:
//! - Dotted-decimal ↔ 32-bit integer conversion ([`encode`], [`decode`])
//! - Policy-driven address generation ([`generate`], [`FALLBACK_ADDRESS`])

mod codec;
mod generator;

#[cfg(test)]
mod codec_tests;
#[cfg(test)]
mod generator_tests;

pub use codec::{AddressError, decode, encode};
pub use generator::{FALLBACK_ADDRESS, generate, list_entries};
