//! Rule descriptor types.
//!
//! Field names and casing follow the declarative request-rule JSON format,
//! so a serialized [`Rule`] can be handed to an enforcement engine as is.

use serde::{Deserialize, Serialize};

/// The only rule id this crate installs.
pub const RULE_ID: u32 = 1;

/// Priority of the installed rule.
pub const RULE_PRIORITY: u32 = 1;

/// Request types a rule condition can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    Ping,
    CspReport,
    Media,
    #[serde(rename = "websocket")]
    WebSocket,
    #[serde(rename = "webtransport")]
    WebTransport,
    #[serde(rename = "webbundle")]
    WebBundle,
    Other,
}

impl ResourceType {
    /// Every resource type, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::MainFrame,
        Self::SubFrame,
        Self::Stylesheet,
        Self::Script,
        Self::Image,
        Self::Font,
        Self::Object,
        Self::XmlHttpRequest,
        Self::Ping,
        Self::CspReport,
        Self::Media,
        Self::WebSocket,
        Self::WebTransport,
        Self::WebBundle,
        Self::Other,
    ];
}

/// What to do with a request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderOperation {
    /// Overwrite the header, adding it if absent.
    Set,
}

/// One header modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyHeaderInfo {
    /// Header name.
    pub header: String,
    /// Operation to perform.
    pub operation: HeaderOperation,
    /// New header value.
    pub value: String,
}

/// Action taken on matching requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleAction {
    /// Rewrite request headers.
    ModifyHeaders {
        /// Request header modifications, applied in order.
        #[serde(rename = "requestHeaders")]
        request_headers: Vec<ModifyHeaderInfo>,
    },
}

/// Which requests a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    /// URL pattern; `*` matches everything.
    pub url_filter: String,

    /// Request types matched.
    pub resource_types: Vec<ResourceType>,

    /// Request domains left untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_request_domains: Option<Vec<String>>,
}

/// A declarative header-rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier.
    pub id: u32,
    /// Rule priority.
    pub priority: u32,
    /// Action on match.
    pub action: RuleAction,
    /// Match condition.
    pub condition: RuleCondition,
}

impl Rule {
    /// Returns the header modifications carried by this rule.
    #[must_use]
    pub fn request_headers(&self) -> &[ModifyHeaderInfo] {
        match &self.action {
            RuleAction::ModifyHeaders { request_headers } => request_headers,
        }
    }
}

/// One atomic change to the installed rule set: removals, then additions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleUpdate {
    /// Ids of rules to remove first.
    pub remove_rule_ids: Vec<u32>,
    /// Rules to add afterwards.
    pub add_rules: Vec<Rule>,
}
