// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change events delivered by a record watcher and the reconcile requests derived
//! from them.

use crate::domain::{NamespacedName, ObjectRef};
use std::fmt;

/// A change observed on some object in the store.
///
/// Every object slot is an `Option`: the delivering framework may hand over an
/// event whose object is missing, and consumers must tolerate that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// An object was created.
    Created(Option<ObjectRef>),
    /// An object was modified (or re-delivered by a resync).
    Updated {
        /// State before the change
        old: Option<ObjectRef>,
        /// State after the change
        new: Option<ObjectRef>,
    },
    /// An object was removed.
    Deleted(Option<ObjectRef>),
    /// A change of unknown kind, for example from an external trigger.
    Generic(Option<ObjectRef>),
}

impl ChangeEvent {
    /// Returns every object slot of the event, present or not.
    pub fn objects(&self) -> Vec<Option<&ObjectRef>> {
        match self {
            ChangeEvent::Created(obj) | ChangeEvent::Deleted(obj) | ChangeEvent::Generic(obj) => {
                vec![obj.as_ref()]
            }
            ChangeEvent::Updated { old, new } => vec![old.as_ref(), new.as_ref()],
        }
    }

    /// Short name of the event kind, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Created(_) => "create",
            ChangeEvent::Updated { .. } => "update",
            ChangeEvent::Deleted(_) => "delete",
            ChangeEvent::Generic(_) => "generic",
        }
    }
}

/// Filters out updates that did not actually change the object.
///
/// Create, delete and generic events always pass. An update passes only when both
/// its objects are present and their resource versions differ, so periodic
/// re-deliveries of unchanged state are suppressed.
pub fn resource_version_changed(event: &ChangeEvent) -> bool {
    match event {
        ChangeEvent::Updated { old, new } => match (old, new) {
            (Some(old), Some(new)) => old.resource_version != new.resource_version,
            (None, _) => {
                tracing::debug!("Update event has no old object, dropping");
                false
            }
            (_, None) => {
                tracing::debug!("Update event has no new object, dropping");
                false
            }
        },
        _ => true,
    }
}

/// A request for a consumer to re-run its reconciliation logic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReconcileRequest(NamespacedName);

impl ReconcileRequest {
    /// Creates a request for the given consumer.
    pub fn new(consumer: NamespacedName) -> Self {
        ReconcileRequest(consumer)
    }

    /// Returns the consumer that must reconcile.
    pub fn name(&self) -> &NamespacedName {
        &self.0
    }
}

impl fmt::Display for ReconcileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
