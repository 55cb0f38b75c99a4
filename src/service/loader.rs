// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bootstrap of the flow export configuration.
//!
//! [`ConfigLoader`] fetches the configuration record and parses it field by field.
//! The collector target is all-or-nothing: without it there is no configuration at
//! all. The optional fields degrade one at a time: a bad value is logged and left
//! unset while the rest of the record is still used.

use crate::domain::flows_config::{
    CACHE_ACTIVE_TIMEOUT_KEY, CACHE_MAX_FLOWS_KEY, NODE_PORT_KEY, SAMPLING_KEY, SHARED_TARGET_KEY,
};
use crate::domain::{
    parse_duration, ConfigRecord, FlowsConfig, FlowsConfigError, FlowsSettings, NamespacedName,
    Result,
};
use crate::ports::RecordReader;

/// Reads and validates the flow export configuration record.
///
/// # Examples
///
/// ```
/// use flowscfg::adapters::InMemoryRecordStore;
/// use flowscfg::domain::FlowsSettings;
/// use flowscfg::service::ConfigLoader;
///
/// let settings = FlowsSettings::default();
/// let store = InMemoryRecordStore::new();
/// let loader = ConfigLoader::new(&settings);
///
/// // not configured yet
/// assert!(loader.bootstrap(&store).is_none());
///
/// store.apply(
///     settings.record().clone(),
///     [("sharedTarget", "1.2.3.4:3030"), ("cacheActiveTimeout", "3200ms")],
/// );
/// let config = loader.bootstrap(&store).unwrap();
/// assert_eq!(config.target(), "1.2.3.4:3030");
/// assert_eq!(config.cache_active_timeout, Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigLoader {
    record: NamespacedName,
}

impl ConfigLoader {
    /// Creates a loader for the record named in `settings`.
    pub fn new(settings: &FlowsSettings) -> Self {
        ConfigLoader {
            record: settings.record().clone(),
        }
    }

    /// Returns the current flow export configuration, or `None` if flow export is
    /// not configured.
    ///
    /// A missing record is the normal "disabled" state and is only logged at debug
    /// level. Any other read failure is logged as a warning; the caller's
    /// reconciliation framework is expected to call again later.
    pub fn bootstrap(&self, reader: &dyn RecordReader) -> Option<FlowsConfig> {
        let record = match reader.get(&self.record) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    record = %self.record,
                    reader = reader.name(),
                    "Configuration record is not defined, flow export disabled"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    record = %self.record,
                    reader = reader.name(),
                    error = %e,
                    "Error fetching configuration record"
                );
                return None;
            }
        };
        self.parse_record(&record)
    }

    /// Parses an already fetched record.
    pub fn parse_record(&self, record: &ConfigRecord) -> Option<FlowsConfig> {
        let target = match resolve_target(record) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(
                    record = %record.name(),
                    keys = ?record.data().keys().collect::<Vec<_>>(),
                    error = %e,
                    "Wrong data section, ignoring configuration record"
                );
                return None;
            }
        };
        let mut config = FlowsConfig::new(target)?;

        config.cache_active_timeout =
            optional_field(record, CACHE_ACTIVE_TIMEOUT_KEY, |raw| {
                parse_cache_active_timeout(record.name(), raw)
            });
        config.cache_max_flows =
            optional_field(record, CACHE_MAX_FLOWS_KEY, |raw| parse_u32(CACHE_MAX_FLOWS_KEY, raw));
        config.sampling = optional_field(record, SAMPLING_KEY, |raw| parse_u32(SAMPLING_KEY, raw));

        tracing::debug!(record = %record.name(), config = %config, "Loaded flow export configuration");
        Some(config)
    }
}

/// Picks the collector address: the shared target, else the node port on the
/// node's own address. Empty values count as absent.
fn resolve_target(record: &ConfigRecord) -> Result<String> {
    if let Some(shared) = record.get(SHARED_TARGET_KEY).filter(|v| !v.is_empty()) {
        return Ok(shared.to_string());
    }
    if let Some(port) = record.get(NODE_PORT_KEY).filter(|v| !v.is_empty()) {
        // empty host is resolved to the node IP by the consumer
        return Ok(format!(":{}", port));
    }
    Err(FlowsConfigError::MissingTarget {
        record: record.name().clone(),
    })
}

/// Parses `key` if present, logging and discarding a value that does not parse.
fn optional_field<T>(
    record: &ConfigRecord,
    key: &str,
    parse: impl FnOnce(&str) -> Result<T>,
) -> Option<T> {
    let raw = record.get(key)?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                record = %record.name(),
                key,
                value = raw,
                error = %e,
                "Wrong configuration value, ignoring"
            );
            None
        }
    }
}

/// Converts a duration string to whole seconds, truncating any remainder.
fn parse_cache_active_timeout(record: &NamespacedName, raw: &str) -> Result<u64> {
    let duration = parse_duration(raw).map_err(|source| FlowsConfigError::InvalidDuration {
        key: CACHE_ACTIVE_TIMEOUT_KEY.to_string(),
        source,
    })?;
    let seconds = duration.as_secs();
    if duration.subsec_nanos() != 0 {
        tracing::info!(
            record = %record,
            key = CACHE_ACTIVE_TIMEOUT_KEY,
            value = raw,
            seconds,
            "Value will be truncated to whole seconds"
        );
    }
    Ok(seconds)
}

/// Parses an unsigned decimal integer in 32-bit range. Signs and whitespace are
/// rejected.
fn parse_u32(key: &str, raw: &str) -> Result<u32> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FlowsConfigError::InvalidField {
            key: key.to_string(),
            value: raw.to_string(),
            source: "expected an unsigned decimal integer".into(),
        });
    }
    raw.parse::<u32>()
        .map_err(|e| FlowsConfigError::from_parse_int_error(key, raw, e))
}
