//! Policy-driven address generation.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::settings::{Mode, Settings};

use super::codec::{AddressError, decode, encode};

/// Address returned in list mode when the list has no usable entries.
pub const FALLBACK_ADDRESS: &str = "127.0.0.1";

/// Returns the usable entries of a newline-delimited address list.
///
/// Entries are trimmed and blank lines are dropped; order is preserved.
#[must_use]
pub fn list_entries(list: &str) -> Vec<&str> {
    list.lines()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Produces one address according to the active [`Mode`].
///
/// Only the parameters of the active mode are consulted:
/// - [`Mode::Manual`]: `manual_address`, returned verbatim.
/// - [`Mode::Range`]: a uniform draw from the inclusive range spanned by
///   `range_from` and `range_to`, in either order.
/// - [`Mode::List`]: a uniform choice among [`list_entries`] of
///   `address_list`, or [`FALLBACK_ADDRESS`] when there are none.
///
/// # Errors
///
/// Returns [`AddressError::InvalidAddress`] in range mode when either bound
/// is not a well-formed IPv4 address.
pub fn generate<R>(settings: &Settings, rng: &mut R) -> Result<String, AddressError>
where
    R: Rng + ?Sized,
{
    match settings.mode {
        Mode::Manual => Ok(settings.manual_address.clone()),
        Mode::Range => {
            let from = encode(&settings.range_from)?;
            let to = encode(&settings.range_to)?;
            let (start, end) = (from.min(to), from.max(to));
            Ok(decode(rng.gen_range(start..=end)))
        }
        Mode::List => {
            let entries = list_entries(&settings.address_list);
            let chosen = entries.choose(rng).copied().unwrap_or(FALLBACK_ADDRESS);
            Ok(chosen.to_string())
        }
    }
}
