//! Server configuration from `UNITOPIA_*` environment variables

use std::env;
use tracing::warn;
use unitopia::{DisplayPolicy, FormatOptions, UnitStyle};

const PRECISION: &str = "UNITOPIA_PRECISION";
const UNIT_STYLE: &str = "UNITOPIA_UNIT_STYLE";
const GROUPING: &str = "UNITOPIA_GROUPING";
const DECIMAL_SEPARATOR: &str = "UNITOPIA_DECIMAL_SEPARATOR";
const DISPLAY_POLICY: &str = "UNITOPIA_DISPLAY_POLICY";

/// Upper bound on fraction digits accepted from the environment or a tool call
pub const MAX_PRECISION: usize = 15;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerConfig {
    pub format: FormatOptions,
    pub display_policy: DisplayPolicy,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; invalid values warn and keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ServerConfig::default();

        if let Some(raw) = lookup(PRECISION) {
            match parse_precision(&raw) {
                Some(p) => config.format.max_fraction_digits = p,
                None => warn!(key = PRECISION, value = %raw, "invalid precision, using default"),
            }
        }

        if let Some(raw) = lookup(UNIT_STYLE) {
            match UnitStyle::from_name(&raw) {
                Some(style) => config.format.unit_style = style,
                None => warn!(key = UNIT_STYLE, value = %raw, "unknown unit style, using default"),
            }
        }

        if let Some(raw) = lookup(GROUPING) {
            match parse_bool(&raw) {
                Some(b) => config.format.grouping = b,
                None => warn!(key = GROUPING, value = %raw, "expected true or false, using default"),
            }
        }

        if let Some(raw) = lookup(DECIMAL_SEPARATOR) {
            match raw.trim() {
                "." => config.format = config.format.with_separators('.', ','),
                "," => config.format = config.format.with_separators(',', '.'),
                _ => warn!(key = DECIMAL_SEPARATOR, value = %raw, "decimal separator must be '.' or ',', using default"),
            }
        }

        if let Some(raw) = lookup(DISPLAY_POLICY) {
            match DisplayPolicy::from_name(&raw) {
                Some(policy) => config.display_policy = policy,
                None => warn!(key = DISPLAY_POLICY, value = %raw, "unknown display policy, using default"),
            }
        }

        config
    }
}

pub fn parse_precision(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|p| *p <= MAX_PRECISION)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
