// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identities the components are constructed with.

use crate::domain::{FlowsConfigError, NamespacedName, Result};

/// Name of the record holding the flow export settings.
pub const DEFAULT_RECORD_NAME: &str = "ovs-flows-config";
/// Namespace the network operator applies its objects to.
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "openshift-network-operator";
/// Name of the operator configuration object that reconciles flow export.
pub const DEFAULT_OPERATOR_CONFIG_NAME: &str = "cluster";

/// The watched record and the consumer to notify when it changes.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::FlowsSettings;
///
/// let settings = FlowsSettings::default();
/// assert_eq!(settings.record().to_string(), "openshift-network-operator/ovs-flows-config");
/// assert_eq!(settings.consumer().to_string(), "openshift-network-operator/cluster");
///
/// let staging = FlowsSettings::for_namespace("staging");
/// assert_eq!(staging.record().namespace(), "staging");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowsSettings {
    record: NamespacedName,
    consumer: NamespacedName,
}

impl FlowsSettings {
    /// Creates settings from explicit identities.
    pub fn new(record: NamespacedName, consumer: NamespacedName) -> Self {
        FlowsSettings { record, consumer }
    }

    /// Default names, with both identities placed in `namespace`.
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        FlowsSettings {
            record: NamespacedName::new(DEFAULT_RECORD_NAME, namespace.clone()),
            consumer: NamespacedName::new(DEFAULT_OPERATOR_CONFIG_NAME, namespace),
        }
    }

    /// Returns the watched record identity.
    pub fn record(&self) -> &NamespacedName {
        &self.record
    }

    /// Returns the consumer identity.
    pub fn consumer(&self) -> &NamespacedName {
        &self.consumer
    }

    /// Replaces the watched record identity.
    pub fn with_record(mut self, record: NamespacedName) -> Self {
        self.record = record;
        self
    }

    /// Replaces the consumer identity.
    pub fn with_consumer(mut self, consumer: NamespacedName) -> Self {
        self.consumer = consumer;
        self
    }

    /// Checks that no identity part is empty.
    pub fn validate(&self) -> Result<()> {
        for (what, id) in [("record", &self.record), ("consumer", &self.consumer)] {
            if id.name().is_empty() || id.namespace().is_empty() {
                return Err(FlowsConfigError::SettingsError {
                    message: format!("{} identity '{}' has an empty part", what, id),
                });
            }
        }
        Ok(())
    }
}

impl Default for FlowsSettings {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_OPERATOR_NAMESPACE)
    }
}
