// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store adapter.
//!
//! This module provides a store that keeps records in a map and reports every
//! modification to its watchers, the way an API server would. It backs the
//! crate's tests and demos and suits hosts that feed records in from elsewhere.

use crate::domain::{
    ChangeEvent, ConfigRecord, FlowsConfigError, NamespacedName, ObjectRef, Result,
};
use crate::ports::{EventCallback, RecordReader, RecordWatcher};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};

#[derive(Default)]
struct StoreInner {
    records: RwLock<HashMap<NamespacedName, ConfigRecord>>,
    subscribers: RwLock<Vec<(u64, EventCallback)>>,
    last_version: AtomicU64,
    last_subscriber: AtomicU64,
    /// Delivery order: tickets are taken in version order, events delivered by ticket
    last_ticket: AtomicU64,
    delivered: Mutex<u64>,
    turn: Condvar,
}

impl StoreInner {
    fn take_ticket(&self) -> u64 {
        self.last_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Marks a ticket as delivered when dropped, even if a callback panicked.
struct DeliveredOnDrop<'a>(&'a StoreInner);

impl Drop for DeliveredOnDrop<'_> {
    fn drop(&mut self) {
        let mut delivered = self.0.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        *delivered += 1;
        self.0.turn.notify_all();
    }
}

/// A shared, in-memory record store.
///
/// Clones share the same records and watchers. Each clone can hold one watch
/// subscription of its own.
///
/// Resource versions are bumped only when a record's data actually changes.
/// Events are delivered after the store lock is released, so a callback may read
/// the store synchronously, and they reach watchers in resource-version order even
/// when several threads modify the store at once. A callback must not modify the
/// store it is watching; it would wait for its own delivery to finish.
///
/// A callback may hold a clone of the store. The subscription is removed when the
/// watching handle is stopped or dropped, which releases that clone.
///
/// # Examples
///
/// ```rust
/// use flowscfg::adapters::InMemoryRecordStore;
/// use flowscfg::domain::NamespacedName;
/// use flowscfg::ports::RecordReader;
///
/// let store = InMemoryRecordStore::new();
/// let id = NamespacedName::new("ovs-flows-config", "openshift-network-operator");
/// store.apply(id.clone(), [("nodePort", "3131")]);
///
/// let record = store.get(&id).unwrap();
/// assert_eq!(record.get("nodePort"), Some("3131"));
/// assert_eq!(record.resource_version(), "1");
/// ```
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Arc<StoreInner>,
    subscription: Option<u64>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the record `name` with `data`.
    ///
    /// Emits `Created` for a new record and `Updated` when the data changed. An
    /// apply that changes nothing emits nothing and keeps the resource version.
    pub fn apply<I, K, V>(&self, name: NamespacedName, data: I) -> ObjectRef
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data: BTreeMap<String, String> = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let (ticket, event, current) = {
            let mut records = self.inner.records.write().unwrap();
            let previous = records.get(&name).cloned();
            if let Some(prev) = &previous {
                if prev.data() == &data {
                    return prev.object_ref();
                }
            }
            let version = self.inner.last_version.fetch_add(1, Ordering::SeqCst) + 1;
            let record =
                ConfigRecord::with_data(name.clone(), data).with_resource_version(version.to_string());
            let current = record.object_ref();
            records.insert(name, record);
            let event = match previous {
                Some(prev) => ChangeEvent::Updated {
                    old: Some(prev.object_ref()),
                    new: Some(current.clone()),
                },
                None => ChangeEvent::Created(Some(current.clone())),
            };
            (self.inner.take_ticket(), event, current)
        };

        self.deliver(ticket, vec![event]);
        current
    }

    /// Removes the record `name`, returning whether it existed.
    pub fn delete(&self, name: &NamespacedName) -> bool {
        let removed = {
            let mut records = self.inner.records.write().unwrap();
            records
                .remove(name)
                .map(|record| (self.inner.take_ticket(), record))
        };
        match removed {
            Some((ticket, record)) => {
                self.deliver(ticket, vec![ChangeEvent::Deleted(Some(record.object_ref()))]);
                true
            }
            None => false,
        }
    }

    /// Re-delivers every record as an update with an unchanged resource version.
    pub fn resync(&self) {
        let (ticket, events) = {
            let records = self.inner.records.read().unwrap();
            let events: Vec<ChangeEvent> = records
                .values()
                .map(ConfigRecord::object_ref)
                .map(|obj| ChangeEvent::Updated {
                    old: Some(obj.clone()),
                    new: Some(obj),
                })
                .collect();
            (self.inner.take_ticket(), events)
        };
        self.deliver(ticket, events);
    }

    /// Delivers `event` to every watcher, after any change already in flight.
    pub fn notify(&self, event: ChangeEvent) {
        let ticket = self.inner.take_ticket();
        self.deliver(ticket, vec![event]);
    }

    /// Waits for every earlier ticket to be delivered, then delivers `events`.
    fn deliver(&self, ticket: u64, events: Vec<ChangeEvent>) {
        {
            let mut delivered = self.inner.delivered.lock().unwrap();
            while *delivered + 1 != ticket {
                delivered = self.inner.turn.wait(delivered).unwrap();
            }
        }
        let _done = DeliveredOnDrop(&self.inner);

        let callbacks: Vec<EventCallback> = self
            .inner
            .subscribers
            .read()
            .unwrap()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for event in events {
            tracing::trace!(kind = event.kind(), watchers = callbacks.len(), "Delivering change event");
            for callback in &callbacks {
                callback(event.clone());
            }
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.inner.records.read().unwrap().len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for InMemoryRecordStore {
    fn clone(&self) -> Self {
        InMemoryRecordStore {
            inner: Arc::clone(&self.inner),
            subscription: None,
        }
    }
}

impl fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("records", &self.len())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl RecordReader for InMemoryRecordStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
        self.inner
            .records
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| FlowsConfigError::RecordNotFound { name: name.clone() })
    }
}

impl RecordWatcher for InMemoryRecordStore {
    fn watch(&mut self, callback: EventCallback) -> Result<()> {
        if self.subscription.is_some() {
            return Err(FlowsConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }
        let id = self.inner.last_subscriber.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .subscribers
            .write()
            .unwrap()
            .push((id, callback));
        self.subscription = Some(id);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(id) = self.subscription.take() {
            self.inner
                .subscribers
                .write()
                .unwrap()
                .retain(|(sub, _)| *sub != id);
        }
        Ok(())
    }
}

impl Drop for InMemoryRecordStore {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
