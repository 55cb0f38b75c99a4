// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed loading and change detection for the flow export configuration record.
//!
//! Flow export (IPFIX, sFlow, NetFlow) from Open vSwitch is configured through a
//! loosely-typed key/value record, `ovs-flows-config`, living in the network
//! operator's namespace. This crate turns that record into a validated
//! [`FlowsConfig`](domain::FlowsConfig) and decides which store changes should
//! make the operator reconcile.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`NamespacedName`, `ConfigRecord`, `FlowsConfig`,
//!   `ChangeEvent`, errors)
//! - **Ports**: Trait definitions for the outside world (`RecordReader`,
//!   `RecordWatcher`, `ManifestParser`)
//! - **Adapters**: Implementations of those ports (in-memory store, YAML manifests,
//!   manifest file watching) and settings adapters (environment, command line)
//! - **Service**: The two stateless components, `ChangeFilter` and `ConfigLoader`
//!
//! # Record Format
//!
//! | key                  | meaning                                            |
//! |----------------------|----------------------------------------------------|
//! | `sharedTarget`       | collector `host:port` shared by every node         |
//! | `nodePort`           | collector port on each node's own address          |
//! | `cacheActiveTimeout` | aggregation period, e.g. `60s`; whole seconds kept |
//! | `cacheMaxFlows`      | flows per aggregate before sending                 |
//! | `sampling`           | 1-in-N sampling rate, 0 disables                   |
//!
//! A target is required; without one flow export is disabled. The other keys are
//! optional and an invalid value is ignored on its own.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML manifest support (default)
//! - `env`: Enable settings from environment variables (default)
//! - `cli`: Enable settings from command-line arguments (default)
//! - `reload`: Enable manifest file watching
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use flowscfg::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! # fn main() -> Result<()> {
//! let settings = FlowsSettings::default();
//! let mut store = InMemoryRecordStore::new();
//!
//! let queue = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&queue);
//! watch_for_record(
//!     &mut store,
//!     ChangeFilter::new(&settings),
//!     Arc::new(move |request: ReconcileRequest| sink.lock().unwrap().push(request)),
//! )?;
//!
//! store.apply(settings.record().clone(), [("sharedTarget", "10.0.0.5:2055")]);
//!
//! for _request in queue.lock().unwrap().drain(..) {
//!     let config = ConfigLoader::new(&settings).bootstrap(&store).unwrap();
//!     assert_eq!(config.target(), "10.0.0.5:2055");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ChangeEvent, ConfigRecord, FlowsConfig, FlowsConfigError, FlowsSettings, NamespacedName,
        ReconcileRequest, Result,
    };
    pub use crate::ports::{ManifestParser, RecordReader, RecordWatcher};
    pub use crate::service::{watch_for_record, ChangeFilter, ConfigLoader};

    pub use crate::adapters::InMemoryRecordStore;

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineSettings;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvSettingsAdapter;
    #[cfg(feature = "reload")]
    pub use crate::adapters::ManifestFileWatcher;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlManifestParser, YamlManifestReader};
}
