//! Splitter configuration: parsing and loading.
//!
//! A config names the [`BoundaryRule`] in its short text form and, optionally,
//! the [`OrderPolicy`]:
//!
//! ```toml
//! rule = "5m"
//! order = "best_effort"   # default: "reject"
//! ```
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file path: [`load_config_path`]
//! - Read `BAR_SPLIT_RULE` / `BAR_SPLIT_ORDER` from the environment: [`SplitConfig::from_env`]

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, rule::BoundaryRule, splitter::OrderPolicy};

/// Environment variable holding the rule text (e.g. `"15s"`).
pub const RULE_ENV: &str = "BAR_SPLIT_RULE";
/// Environment variable holding the order policy (`"reject"` or `"best_effort"`).
pub const ORDER_ENV: &str = "BAR_SPLIT_ORDER";

/// Everything needed to build a [`BarSplitter`](crate::BarSplitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfig {
    /// Window rule, in text form in TOML.
    pub rule: BoundaryRule,
    /// What to do with ticks that go back in time.
    #[serde(default)]
    pub order: OrderPolicy,
}

impl SplitConfig {
    /// Config with the default (rejecting) order policy.
    pub fn new(rule: BoundaryRule) -> Self {
        Self {
            rule,
            order: OrderPolicy::default(),
        }
    }

    /// Build a config from [`RULE_ENV`] (required) and [`ORDER_ENV`] (optional).
    pub fn from_env() -> anyhow::Result<Self> {
        let rule = get_env_var(RULE_ENV)?;
        let rule: BoundaryRule = rule
            .parse()
            .with_context(|| format!("bad {RULE_ENV}: {rule}"))?;
        let order: OrderPolicy = match std::env::var(ORDER_ENV) {
            Ok(order) => order
                .parse()
                .with_context(|| format!("bad {ORDER_ENV}: {order}"))?,
            Err(_) => OrderPolicy::default(),
        };
        Ok(Self { rule, order })
    }
}

/// Reads an environment variable, returning a structured error if it's missing.
fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Parse a config from TOML text.
pub fn load_config_str(s: &str) -> anyhow::Result<SplitConfig> {
    toml::from_str(s).context("parse splitter config TOML")
}

/// Read and parse a TOML config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<SplitConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    load_config_str(&text).with_context(|| format!("load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_defaults_to_reject() {
        let cfg = load_config_str(r#"rule = "15s""#).unwrap();
        assert_eq!(cfg, SplitConfig::new(BoundaryRule::seconds(15).unwrap()));
    }

    #[test]
    fn explicit_order_policy() {
        let cfg = load_config_str(
            r#"
rule = "1W"
order = "best_effort"
"#,
        )
        .unwrap();
        assert_eq!(cfg.rule, BoundaryRule::Week);
        assert_eq!(cfg.order, OrderPolicy::BestEffort);
    }

    #[test]
    fn invalid_rule_and_unknown_keys_fail() {
        assert!(load_config_str(r#"rule = "7m""#).is_err());
        assert!(load_config_str(r#"rule = "5m"
width = 3"#)
        .is_err());
        assert!(load_config_str("").is_err());
    }

    #[test]
    fn serializes_back_to_text_form() {
        let cfg = SplitConfig::new(BoundaryRule::hours(4).unwrap());
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains(r#"rule = "4h""#), "{text}");
        assert_eq!(load_config_str(&text).unwrap(), cfg);
    }
}
