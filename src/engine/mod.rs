//! Rule enforcement.
//!
//! This module provides the abstraction over the engine that applies
//! installed header-rewrite rules to network traffic, and a file-backed
//! implementation that keeps the installed rule table on disk.

mod file;

#[cfg(test)]
mod file_tests;

pub use file::FileRuleEngine;

use std::future::Future;
use std::io;

use thiserror::Error;

use crate::rule::{Rule, RuleUpdate};

/// Errors reported by a [`RuleEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to read the installed rule table.
    #[error("Failed to read rule table: {0}")]
    Read(#[source] io::Error),

    /// The installed rule table could not be parsed.
    #[error("Rule table is corrupted: {reason}")]
    Corrupted {
        /// Reason for corruption
        reason: String,
    },

    /// Failed to write the installed rule table.
    #[error("Failed to write rule table: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize the rule table.
    #[error("Failed to serialize rule table: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An added rule reuses the id of a rule that stays installed.
    #[error("Rule id {0} is already installed")]
    DuplicateRuleId(u32),
}

/// Engine that enforces declarative header-rewrite rules.
///
/// An update is applied as one step: its removals and additions either all
/// take effect or none do.
pub trait RuleEngine: Send + Sync {
    /// Removes `update.remove_rule_ids`, then installs `update.add_rules`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the update is rejected; the installed rules
    /// are then unchanged.
    fn update_rules(&self, update: RuleUpdate)
    -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Returns the currently installed rules.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the installed rules cannot be read.
    fn installed_rules(&self) -> impl Future<Output = Result<Vec<Rule>, EngineError>> + Send;
}

/// Applies `update` to `rules`, rejecting duplicate ids.
///
/// # Errors
///
/// Returns [`EngineError::DuplicateRuleId`] if an added rule's id is still
/// installed after the removals (or is added twice).
pub fn apply_update(mut rules: Vec<Rule>, update: RuleUpdate) -> Result<Vec<Rule>, EngineError> {
    rules.retain(|rule| !update.remove_rule_ids.contains(&rule.id));

    for rule in update.add_rules {
        if rules.iter().any(|installed| installed.id == rule.id) {
            return Err(EngineError::DuplicateRuleId(rule.id));
        }
        rules.push(rule);
    }

    Ok(rules)
}

/// Mock rule engine for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A mock implementation of [`RuleEngine`] for testing.
    ///
    /// Records every update and can be told to reject them.
    #[derive(Debug, Default)]
    pub struct MockRuleEngine {
        rules: RwLock<Vec<Rule>>,
        updates: RwLock<Vec<RuleUpdate>>,
        reject: AtomicBool,
    }

    impl MockRuleEngine {
        /// Creates an engine with no installed rules.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent update fail.
        pub fn reject_updates(&self) {
            self.reject.store(true, Ordering::SeqCst);
        }

        /// Returns the installed rules.
        #[must_use]
        pub fn rules(&self) -> Vec<Rule> {
            self.rules.read().unwrap().clone()
        }

        /// Returns every accepted update, oldest first.
        #[must_use]
        pub fn updates(&self) -> Vec<RuleUpdate> {
            self.updates.read().unwrap().clone()
        }
    }

    impl RuleEngine for MockRuleEngine {
        async fn update_rules(&self, update: RuleUpdate) -> Result<(), EngineError> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(EngineError::Write(io::Error::other("mock rejection")));
            }
            let rules = apply_update(self.rules(), update.clone())?;
            *self.rules.write().unwrap() = rules;
            self.updates.write().unwrap().push(update);
            Ok(())
        }

        async fn installed_rules(&self) -> Result<Vec<Rule>, EngineError> {
            Ok(self.rules())
        }
    }
}
