// SPDX-License-Identifier: MIT OR Apache-2.0

//! The raw configuration record read from a store.

use crate::domain::NamespacedName;
use std::collections::BTreeMap;

/// Identity plus resource version of an object, as carried by change events.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Identity of the object
    pub name: NamespacedName,
    /// Opaque version string, changed by the store on every real modification
    pub resource_version: String,
}

impl ObjectRef {
    /// Creates a new object reference.
    pub fn new(name: NamespacedName, resource_version: impl Into<String>) -> Self {
        ObjectRef {
            name,
            resource_version: resource_version.into(),
        }
    }
}

/// A loosely-typed, namespaced key/value record.
///
/// This is the shape of a ConfigMap's `data` section: a flat string-to-string map.
/// Keys the loader does not recognize are carried along and ignored.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::{ConfigRecord, NamespacedName};
///
/// let record = ConfigRecord::new(NamespacedName::new("ovs-flows-config", "ns"))
///     .with_entry("sharedTarget", "1.2.3.4:3030");
/// assert_eq!(record.get("sharedTarget"), Some("1.2.3.4:3030"));
/// assert_eq!(record.get("nodePort"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    name: NamespacedName,
    resource_version: String,
    data: BTreeMap<String, String>,
}

impl ConfigRecord {
    /// Creates an empty record with the given identity.
    pub fn new(name: NamespacedName) -> Self {
        ConfigRecord {
            name,
            resource_version: String::new(),
            data: BTreeMap::new(),
        }
    }

    /// Creates a record from an existing data map.
    pub fn with_data(name: NamespacedName, data: BTreeMap<String, String>) -> Self {
        ConfigRecord {
            name,
            resource_version: String::new(),
            data,
        }
    }

    /// Sets the resource version.
    pub fn with_resource_version(mut self, resource_version: impl Into<String>) -> Self {
        self.resource_version = resource_version.into();
        self
    }

    /// Adds a single data entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns the record identity.
    pub fn name(&self) -> &NamespacedName {
        &self.name
    }

    /// Returns the resource version.
    pub fn resource_version(&self) -> &str {
        &self.resource_version
    }

    /// Looks up a data entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns the whole data map.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Returns the event-level reference to this record.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.name.clone(), self.resource_version.clone())
    }
}
