// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record watcher trait definition.
//!
//! This module defines the `RecordWatcher` trait, which delivers change events for
//! objects in a store, and the callback types used to receive those events and to
//! hand reconcile requests to a work queue.

use crate::domain::{ChangeEvent, ReconcileRequest, Result};
use std::sync::Arc;

/// Callback invoked for every change event a watcher observes.
pub type EventCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Callback that enqueues a reconcile request in the host's work queue.
pub type ReconcileCallback = Arc<dyn Fn(ReconcileRequest) + Send + Sync>;

/// A trait for watching a store for object changes.
///
/// Watchers report changes to *any* object they observe; deciding which ones matter
/// is the job of [`ChangeFilter`](crate::service::ChangeFilter).
///
/// # Examples
///
/// ```rust
/// use flowscfg::ports::{EventCallback, RecordWatcher};
/// use flowscfg::domain::Result;
///
/// struct IdleWatcher;
///
/// impl RecordWatcher for IdleWatcher {
///     fn watch(&mut self, _callback: EventCallback) -> Result<()> {
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait RecordWatcher: Send + Sync {
    /// Starts delivering change events to `callback`.
    ///
    /// The callback should be non-blocking to avoid delaying the watcher.
    fn watch(&mut self, callback: EventCallback) -> Result<()>;

    /// Stops delivering change events and releases watcher resources.
    fn stop(&mut self) -> Result<()>;
}
