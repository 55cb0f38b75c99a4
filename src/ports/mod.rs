// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between the flows configuration core and the world
//! around it: where records are read from, how changes are observed and how
//! manifest files are parsed. Adapters in the adapters layer implement them.

pub mod parser;
pub mod reader;
pub mod watcher;

// Re-export commonly used types
pub use parser::ManifestParser;
pub use reader::RecordReader;
pub use watcher::{EventCallback, ReconcileCallback, RecordWatcher};
