//! Declarative header-rewrite rules.
//!
//! This module provides:
//! - The rule descriptor understood by the enforcement engine ([`Rule`])
//! - The single atomic update sent to the engine ([`RuleUpdate`])
//! - Rule construction from settings and an address ([`build`], [`RuleDirective`])
//!
//! Exactly one rule id ([`RULE_ID`]) is ever used, so rebuilding always
//! replaces the previously installed rule instead of adding a second one.

mod builder;
mod descriptor;
mod error;


pub use builder::{RuleDirective, build};
pub use descriptor::{
    HeaderOperation, ModifyHeaderInfo, RULE_ID, Rule, RuleAction, RuleCondition, RuleUpdate,
    ResourceType,
};
pub use error::RuleError;
