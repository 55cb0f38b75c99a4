// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest parser trait definition.
//!
//! This module defines the `ManifestParser` trait, which turns the text of a
//! manifest file into the configuration records it declares.

use crate::domain::{ConfigRecord, Result};

/// A trait for parsing manifest files into records.
///
/// A manifest may declare any number of objects; parsers return only those that
/// are key/value configuration records and skip everything else.
///
/// # Examples
///
/// ```rust
/// use flowscfg::ports::ManifestParser;
/// use flowscfg::domain::{ConfigRecord, Result};
///
/// struct NothingParser;
///
/// impl ManifestParser for NothingParser {
///     fn parse(&self, _content: &str) -> Result<Vec<ConfigRecord>> {
///         Ok(Vec::new())
///     }
/// }
///
/// assert!(NothingParser.parse("anything").unwrap().is_empty());
/// ```
pub trait ManifestParser: Send + Sync {
    /// Parses manifest content into the records it declares.
    fn parse(&self, content: &str) -> Result<Vec<ConfigRecord>>;
}
