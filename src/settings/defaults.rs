//! Default values for a freshly installed settings record.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

/// Default master switch.
pub const ENABLED: bool = true;

/// Default rotation interval in minutes.
pub const ROTATION_INTERVAL_MINUTES: u32 = 1;

/// Headers rewritten out of the box.
pub const HEADER_NAMES: [&str; 3] = ["X-Forwarded-For", "X-Real-IP", "Forwarded"];

/// Default manual-mode address.
pub const MANUAL_ADDRESS: &str = "127.0.0.1";

/// Default lower range bound.
pub const RANGE_FROM: &str = "0.0.0.0";

/// Default upper range bound.
pub const RANGE_TO: &str = "255.255.255.255";

/// Default newline-delimited address list.
pub const ADDRESS_LIST: &str = "127.0.0.1\n192.168.1.1\n10.0.0.1\n8.8.8.8";

/// Domains excluded from rewriting out of the box.
pub const EXCLUDED_DOMAINS: [&str; 1] = ["ignore_this_domain.com"];

/// `currentAddress` before the first rule build.
pub const UNKNOWN_ADDRESS: &str = "N/A";

/// `currentAddress` while no rule is installed.
pub const DISABLED_ADDRESS: &str = "Disabled";

/// Client-identity headers commonly trusted by servers and proxies.
///
/// Any header name may be configured; this is the catalog offered to users.
pub const KNOWN_HEADERS: [&str; 14] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP",
    "True-Client-IP",
    "Forwarded",
    "Client-IP",
    "Via",
    "X-Cluster-Client-IP",
    "X-Originating-IP",
    "WL-Proxy-Client-IP",
    "Proxy-Client-IP",
    "Source-IP",
    "X-Remote-IP",
    "X-Remote-Addr",
];
