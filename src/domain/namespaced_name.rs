// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespaced object identity.
//!
//! This module provides the `NamespacedName` type, the `(name, namespace)` pair that
//! identifies both the watched configuration record and the consumer that must
//! reconcile when it changes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type-safe `(name, namespace)` identity.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::NamespacedName;
///
/// let id = NamespacedName::new("ovs-flows-config", "openshift-network-operator");
/// assert_eq!(id.name(), "ovs-flows-config");
/// assert_eq!(id.to_string(), "openshift-network-operator/ovs-flows-config");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    name: String,
    namespace: String,
}

impl NamespacedName {
    /// Creates a new identity from a name and a namespace.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        NamespacedName {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Returns the object name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the object namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
