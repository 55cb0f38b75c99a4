// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: record readers, record watchers and manifest parsers, plus the
//! adapters that resolve the crate's own settings from the environment and the
//! command line.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
pub mod memory;
#[cfg(feature = "yaml")]
pub mod yaml_manifest;

pub mod watchers;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineSettings;
#[cfg(feature = "env")]
pub use env_var::EnvSettingsAdapter;
pub use memory::InMemoryRecordStore;
#[cfg(feature = "reload")]
pub use watchers::ManifestFileWatcher;
#[cfg(feature = "yaml")]
pub use yaml_manifest::{YamlManifestParser, YamlManifestReader};
