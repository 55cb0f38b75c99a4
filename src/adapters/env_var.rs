// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable settings adapter.
//!
//! This module provides an adapter that overrides [`FlowsSettings`] identities from
//! environment variables, so a host can point the components at a different
//! record or namespace without recompiling.

use crate::domain::{FlowsSettings, NamespacedName, Result};
use std::collections::HashMap;
use std::env;

/// Longest accepted value, the limit on object names
const MAX_ENV_VALUE_LEN: usize = 253;

/// Variable naming the watched record.
pub const CONFIG_NAME_VAR: &str = "CONFIG_NAME";
/// Variable naming the watched record's namespace.
pub const CONFIG_NAMESPACE_VAR: &str = "CONFIG_NAMESPACE";
/// Variable naming the consumer to notify.
pub const OPERATOR_CONFIG_NAME_VAR: &str = "OPERATOR_CONFIG_NAME";
/// Variable naming the consumer's namespace.
pub const OPERATOR_NAMESPACE_VAR: &str = "OPERATOR_NAMESPACE";

/// Default prefix for the variables read by [`EnvSettingsAdapter::new`].
pub const DEFAULT_PREFIX: &str = "FLOWS_";

/// Settings adapter for environment variables.
///
/// Reads `<prefix>CONFIG_NAME`, `<prefix>CONFIG_NAMESPACE`,
/// `<prefix>OPERATOR_CONFIG_NAME` and `<prefix>OPERATOR_NAMESPACE`. Each variable
/// that is set and non-empty replaces the matching part of the base settings.
/// Oversized values are skipped.
///
/// # Examples
///
/// ```rust
/// use flowscfg::adapters::EnvSettingsAdapter;
/// use flowscfg::domain::FlowsSettings;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("FLOWS_CONFIG_NAMESPACE".to_string(), "staging".to_string());
///
/// let settings = EnvSettingsAdapter::with_values(vars)
///     .apply(FlowsSettings::default())
///     .unwrap();
/// assert_eq!(settings.record().namespace(), "staging");
/// assert_eq!(settings.record().name(), "ovs-flows-config");
/// ```
#[derive(Debug, Clone)]
pub struct EnvSettingsAdapter {
    /// Prefix prepended to every variable name
    prefix: String,
    /// Pre-populated values; `None` reads the process environment
    values: Option<HashMap<String, String>>,
}

impl EnvSettingsAdapter {
    /// Creates an adapter reading `FLOWS_`-prefixed variables.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Creates an adapter reading variables with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: None,
        }
    }

    /// Creates an adapter with pre-populated values for testing.
    ///
    /// **Note**: This method is primarily intended for testing. Keys must include
    /// the `FLOWS_` prefix.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            values: Some(values),
        }
    }

    fn lookup(&self, var: &str) -> Option<String> {
        let key = format!("{}{}", self.prefix, var);
        let value = match &self.values {
            Some(values) => values.get(&key).cloned(),
            None => env::var(&key).ok(),
        }?;
        if value.is_empty() {
            return None;
        }
        if value.len() > MAX_ENV_VALUE_LEN {
            tracing::debug!(
                "Skipping oversized environment variable {}: len={} (max={})",
                key,
                value.len(),
                MAX_ENV_VALUE_LEN
            );
            return None;
        }
        Some(value)
    }

    /// Applies the overrides found in the environment on top of `base`.
    pub fn apply(&self, base: FlowsSettings) -> Result<FlowsSettings> {
        let record = NamespacedName::new(
            self.lookup(CONFIG_NAME_VAR)
                .unwrap_or_else(|| base.record().name().to_string()),
            self.lookup(CONFIG_NAMESPACE_VAR)
                .unwrap_or_else(|| base.record().namespace().to_string()),
        );
        let consumer = NamespacedName::new(
            self.lookup(OPERATOR_CONFIG_NAME_VAR)
                .unwrap_or_else(|| base.consumer().name().to_string()),
            self.lookup(OPERATOR_NAMESPACE_VAR)
                .unwrap_or_else(|| base.consumer().namespace().to_string()),
        );
        let settings = FlowsSettings::new(record, consumer);
        settings.validate()?;
        tracing::debug!(
            record = %settings.record(),
            consumer = %settings.consumer(),
            prefix = %self.prefix,
            "Resolved settings from environment"
        );
        Ok(settings)
    }
}

impl Default for EnvSettingsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowsSettings {
    /// Default settings overridden by `FLOWS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        EnvSettingsAdapter::new().apply(FlowsSettings::default())
    }
}
