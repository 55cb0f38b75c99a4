// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the flows configuration crate.
//!
//! None of these errors ever reach the caller of
//! [`ConfigLoader::bootstrap`](crate::service::ConfigLoader::bootstrap); they are
//! produced by ports and field parsers, logged, and folded into an absent result
//! or an unset optional field.

use crate::domain::duration::ParseDurationError;
use crate::domain::NamespacedName;
use std::num::ParseIntError;
use thiserror::Error;

/// The main error type for flows configuration operations.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::{FlowsConfigError, NamespacedName};
///
/// let err = FlowsConfigError::RecordNotFound {
///     name: NamespacedName::new("ovs-flows-config", "openshift-network-operator"),
/// };
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowsConfigError {
    /// The requested record does not exist in the store.
    #[error("Configuration record not found: {name}")]
    RecordNotFound {
        /// Identity of the missing record
        name: NamespacedName,
    },

    /// The store failed for a reason other than the record being absent.
    #[error("Record reader '{reader}' error: {message}")]
    ReadError {
        /// Name of the reader that failed
        reader: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Neither `sharedTarget` nor `nodePort` is present in the record.
    #[error("Record {record} has no collector target: either sharedTarget or nodePort is needed")]
    MissingTarget {
        /// Identity of the unusable record
        record: NamespacedName,
    },

    /// An optional numeric field could not be parsed.
    #[error("Invalid {key} value '{value}': {source}")]
    InvalidField {
        /// The record key being parsed
        key: String,
        /// The raw value found in the record
        value: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A duration string could not be parsed.
    #[error("Invalid duration for {key}: {source}")]
    InvalidDuration {
        /// The record key being parsed
        key: String,
        /// The underlying duration error
        #[source]
        source: ParseDurationError,
    },

    /// A manifest document could not be parsed.
    #[error("Failed to parse manifest: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The crate's own settings are invalid.
    #[error("Invalid settings: {message}")]
    SettingsError {
        /// The error message
        message: String,
    },

    /// An error occurred in a record watcher.
    #[error("Record watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading a manifest.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FlowsConfigError {
    /// Returns `true` when the error means the record simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FlowsConfigError::RecordNotFound { .. })
    }

    /// Creates a [`FlowsConfigError::ReadError`] without an underlying source.
    pub fn read_error(reader: impl Into<String>, message: impl Into<String>) -> Self {
        FlowsConfigError::ReadError {
            reader: reader.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates an [`FlowsConfigError::InvalidField`] from a `ParseIntError`.
    pub fn from_parse_int_error(key: &str, value: &str, err: ParseIntError) -> Self {
        FlowsConfigError::InvalidField {
            key: key.to_string(),
            value: value.to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for flows configuration operations.
pub type Result<T> = std::result::Result<T, FlowsConfigError>;
