// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module holds the values that flow between the ports and the services: the
//! raw record, the typed configuration it is parsed into, change events, reconcile
//! requests and the identities the components are built with. It has no knowledge
//! of any particular store or watcher.

pub mod duration;
pub mod errors;
pub mod event;
pub mod flows_config;
pub mod namespaced_name;
pub mod record;
pub mod settings;

// Re-export commonly used types
pub use duration::{parse_duration, ParseDurationError};
pub use errors::{FlowsConfigError, Result};
pub use event::{resource_version_changed, ChangeEvent, ReconcileRequest};
pub use flows_config::FlowsConfig;
pub use namespaced_name::NamespacedName;
pub use record::{ConfigRecord, ObjectRef};
pub use settings::FlowsSettings;
