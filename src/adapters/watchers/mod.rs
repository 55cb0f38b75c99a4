// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watcher implementations for record change detection.
//!
//! This module contains implementations of the `RecordWatcher` trait beyond the
//! in-memory store, which watches itself.

#[cfg(feature = "reload")]
pub mod file_watcher;

#[cfg(feature = "reload")]
pub use file_watcher::{diff_snapshots, ManifestFileWatcher};
