// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change detection for the flows configuration record.
//!
//! A watcher reports changes to every record it can see. [`ChangeFilter`] keeps
//! the one record this crate cares about and turns it into a reconcile request for
//! the consumer that owns flow export, and [`watch_for_record`] wires the two
//! together behind the resource-version predicate.

use crate::domain::{
    resource_version_changed, ChangeEvent, FlowsSettings, NamespacedName, ReconcileRequest,
    Result,
};
use crate::ports::{ReconcileCallback, RecordWatcher};
use std::sync::Arc;

/// Maps change events on the watched record to reconcile requests.
///
/// The filter is stateless: every call depends only on its argument and the
/// identities it was built with, so one instance can be shared across threads.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::{FlowsSettings, NamespacedName};
/// use flowscfg::service::ChangeFilter;
///
/// let filter = ChangeFilter::new(&FlowsSettings::default());
///
/// let watched = NamespacedName::new("ovs-flows-config", "openshift-network-operator");
/// let requests = filter.reconcile_requests(Some(&watched));
/// assert_eq!(requests.len(), 1);
/// assert_eq!(requests[0].name().name(), "cluster");
///
/// let other = NamespacedName::new("kube-root-ca.crt", "openshift-network-operator");
/// assert!(filter.reconcile_requests(Some(&other)).is_empty());
/// assert!(filter.reconcile_requests(None).is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeFilter {
    record: NamespacedName,
    consumer: NamespacedName,
}

impl ChangeFilter {
    /// Creates a filter for the record and consumer named in `settings`.
    pub fn new(settings: &FlowsSettings) -> Self {
        ChangeFilter {
            record: settings.record().clone(),
            consumer: settings.consumer().clone(),
        }
    }

    /// Returns the reconcile requests caused by a change to `object`.
    ///
    /// Yields exactly one request when `object` is the watched record and nothing
    /// otherwise. A missing object is tolerated and logged.
    pub fn reconcile_requests(&self, object: Option<&NamespacedName>) -> Vec<ReconcileRequest> {
        let Some(object) = object else {
            tracing::debug!(
                record = %self.record,
                "Can't create a reconcile request for a missing object"
            );
            return Vec::new();
        };
        if object != &self.record {
            return Vec::new();
        }
        tracing::info!(
            record = %self.record,
            consumer = %self.consumer,
            "Enqueuing reconcile request from configuration record"
        );
        vec![ReconcileRequest::new(self.consumer.clone())]
    }

    /// Returns the reconcile requests caused by `event`.
    ///
    /// Every object slot of the event is mapped; an update that touches the watched
    /// record in both its old and new state still yields a single request.
    pub fn requests_for_event(&self, event: &ChangeEvent) -> Vec<ReconcileRequest> {
        let mut requests: Vec<ReconcileRequest> = Vec::new();
        for object in event.objects() {
            for request in self.reconcile_requests(object.map(|o| &o.name)) {
                if !requests.contains(&request) {
                    requests.push(request);
                }
            }
        }
        requests
    }
}

/// Subscribes `filter` to `watcher`, forwarding accepted requests to `enqueue`.
///
/// Updates that did not change the object's resource version are dropped before
/// they reach the filter.
///
/// # Examples
///
/// ```
/// use flowscfg::adapters::InMemoryRecordStore;
/// use flowscfg::domain::{FlowsSettings, ReconcileRequest};
/// use flowscfg::service::{watch_for_record, ChangeFilter};
/// use std::sync::{Arc, Mutex};
///
/// # fn main() -> flowscfg::domain::Result<()> {
/// let settings = FlowsSettings::default();
/// let mut store = InMemoryRecordStore::new();
/// let queue = Arc::new(Mutex::new(Vec::<ReconcileRequest>::new()));
/// let sink = Arc::clone(&queue);
///
/// watch_for_record(
///     &mut store,
///     ChangeFilter::new(&settings),
///     Arc::new(move |req: ReconcileRequest| sink.lock().unwrap().push(req)),
/// )?;
///
/// store.apply(settings.record().clone(), [("nodePort", "3131")]);
/// assert_eq!(queue.lock().unwrap().len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn watch_for_record(
    watcher: &mut dyn RecordWatcher,
    filter: ChangeFilter,
    enqueue: ReconcileCallback,
) -> Result<()> {
    tracing::debug!(record = %filter.record, "Watching for configuration record changes");
    let filter = Arc::new(filter);
    watcher.watch(Arc::new(move |event: ChangeEvent| {
        if !resource_version_changed(&event) {
            return;
        }
        for request in filter.requests_for_event(&event) {
            enqueue(request);
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObjectRef;

    fn filter() -> ChangeFilter {
        ChangeFilter::new(&FlowsSettings::for_namespace("ns"))
    }

    fn watched(rv: &str) -> Option<ObjectRef> {
        Some(ObjectRef::new(NamespacedName::new("ovs-flows-config", "ns"), rv))
    }

    #[test]
    fn test_exact_match_yields_one_request() {
        let requests =
            filter().reconcile_requests(Some(&NamespacedName::new("ovs-flows-config", "ns")));
        assert_eq!(requests, vec![ReconcileRequest::new(NamespacedName::new("cluster", "ns"))]);
    }

    #[test]
    fn test_name_or_namespace_mismatch_yields_nothing() {
        let f = filter();
        assert!(f
            .reconcile_requests(Some(&NamespacedName::new("ovs-flows-config", "other")))
            .is_empty());
        assert!(f
            .reconcile_requests(Some(&NamespacedName::new("other", "ns")))
            .is_empty());
    }

    #[test]
    fn test_missing_object_yields_nothing() {
        assert!(filter().reconcile_requests(None).is_empty());
    }

    #[test]
    fn test_update_yields_single_request() {
        let event = ChangeEvent::Updated {
            old: watched("1"),
            new: watched("2"),
        };
        assert_eq!(filter().requests_for_event(&event).len(), 1);
    }

    #[test]
    fn test_delete_of_watched_record_yields_request() {
        let event = ChangeEvent::Deleted(watched("3"));
        assert_eq!(filter().requests_for_event(&event).len(), 1);
    }

    #[test]
    fn test_event_with_missing_object_yields_nothing() {
        assert!(filter()
            .requests_for_event(&ChangeEvent::Generic(None))
            .is_empty());
    }

    #[test]
    fn test_filter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeFilter>();
    }
}
