//! Error types for rule construction.

use thiserror::Error;

/// A header the enforcement engine would refuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The header name is not a valid HTTP token.
    #[error("Invalid header name '{name}'")]
    InvalidHeaderName {
        /// The rejected name
        name: String,
    },

    /// The value contains characters not allowed in an HTTP header.
    #[error("Invalid value for header '{name}': {value:?}")]
    InvalidHeaderValue {
        /// The header being set
        name: String,
        /// The rejected value
        value: String,
    },
}
