// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record reader trait definition.
//!
//! This module defines the `RecordReader` trait, the port through which the loader
//! fetches the configuration record from whatever store holds it (a Kubernetes API
//! client, a manifest file, an in-memory map).

use crate::domain::{ConfigRecord, NamespacedName, Result};

/// A trait for stores that can fetch a record by identity.
///
/// Implementations must report a missing record as
/// [`FlowsConfigError::RecordNotFound`](crate::domain::FlowsConfigError::RecordNotFound)
/// so callers can tell the expected "not configured" state apart from real failures.
/// Any cancellation or timeout belongs to the implementation; callers issue exactly
/// one `get` per attempt and never retry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one reader can serve several
/// reconciliation workers.
///
/// # Examples
///
/// ```rust
/// use flowscfg::ports::RecordReader;
/// use flowscfg::domain::{ConfigRecord, FlowsConfigError, NamespacedName, Result};
///
/// struct EmptyStore;
///
/// impl RecordReader for EmptyStore {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
///         Err(FlowsConfigError::RecordNotFound { name: name.clone() })
///     }
/// }
///
/// let err = EmptyStore.get(&NamespacedName::new("a", "b")).unwrap_err();
/// assert!(err.is_not_found());
/// ```
pub trait RecordReader: Send + Sync {
    /// Returns the name of this reader, used in logs and error messages.
    fn name(&self) -> &str;

    /// Fetches the record with the given identity.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigRecord)` - The record exists
    /// * `Err(FlowsConfigError::RecordNotFound)` - The record does not exist
    /// * `Err(_)` - Any other read failure
    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord>;
}

impl<R: RecordReader + ?Sized> RecordReader for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
        (**self).get(name)
    }
}

impl<R: RecordReader + ?Sized> RecordReader for std::sync::Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
        (**self).get(name)
    }
}
