//! Builds the header-rewrite rule from settings.

use http::{HeaderName, HeaderValue};

use crate::settings::Settings;
use crate::settings::defaults::DISABLED_ADDRESS;

use super::descriptor::{
    HeaderOperation, ModifyHeaderInfo, RULE_ID, RULE_PRIORITY, ResourceType, Rule, RuleAction,
    RuleCondition, RuleUpdate,
};
use super::error::RuleError;

/// Outcome of a rule build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDirective {
    /// Replace the installed rule with `rule`, which injects `address`.
    Install {
        /// The rule to install.
        rule: Rule,
        /// The address the rule injects.
        address: String,
    },
    /// Remove any installed rule.
    Remove,
}

impl RuleDirective {
    /// Returns the address to report as current.
    #[must_use]
    pub fn effective_address(&self) -> &str {
        match self {
            Self::Install { address, .. } => address,
            Self::Remove => DISABLED_ADDRESS,
        }
    }

    /// Returns the rule to install, if any.
    #[must_use]
    pub const fn rule(&self) -> Option<&Rule> {
        match self {
            Self::Install { rule, .. } => Some(rule),
            Self::Remove => None,
        }
    }

    /// Converts into the single update that applies this directive.
    ///
    /// The previous rule is always removed in the same update, so the
    /// engine never holds two rules or a gap between them.
    #[must_use]
    pub fn into_update(self) -> RuleUpdate {
        RuleUpdate {
            remove_rule_ids: vec![RULE_ID],
            add_rules: match self {
                Self::Install { rule, .. } => vec![rule],
                Self::Remove => Vec::new(),
            },
        }
    }
}

/// Builds the rule that injects `address` into every configured header.
///
/// Returns [`RuleDirective::Remove`] when rewriting is disabled or no header
/// names are configured. A header named `Forwarded` (any case) receives
/// `for=<address>`; every other header receives the bare address.
///
/// # Errors
///
/// Returns [`RuleError`] if a header name or value is not valid HTTP.
pub fn build(settings: &Settings, address: &str) -> Result<RuleDirective, RuleError> {
    let headers = trimmed(&settings.header_names);
    if !settings.enabled || headers.is_empty() {
        return Ok(RuleDirective::Remove);
    }

    let request_headers = headers
        .into_iter()
        .map(|header| modification(header, address))
        .collect::<Result<Vec<_>, _>>()?;

    let excluded = trimmed(&settings.excluded_domains);
    let excluded_request_domains = (!excluded.is_empty())
        .then(|| excluded.into_iter().map(str::to_string).collect());

    let rule = Rule {
        id: RULE_ID,
        priority: RULE_PRIORITY,
        action: RuleAction::ModifyHeaders { request_headers },
        condition: RuleCondition {
            url_filter: "*".to_string(),
            resource_types: ResourceType::ALL.to_vec(),
            excluded_request_domains,
        },
    };

    Ok(RuleDirective::Install {
        rule,
        address: address.to_string(),
    })
}

fn modification(header: &str, address: &str) -> Result<ModifyHeaderInfo, RuleError> {
    HeaderName::from_bytes(header.as_bytes()).map_err(|_| RuleError::InvalidHeaderName {
        name: header.to_string(),
    })?;

    let value = if header.eq_ignore_ascii_case("forwarded") {
        format!("for={address}")
    } else {
        address.to_string()
    };

    HeaderValue::from_str(&value).map_err(|_| RuleError::InvalidHeaderValue {
        name: header.to_string(),
        value: value.clone(),
    })?;

    Ok(ModifyHeaderInfo {
        header: header.to_string(),
        operation: HeaderOperation::Set,
        value,
    })
}

fn trimmed(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect()
}
