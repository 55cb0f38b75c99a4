// SPDX-License-Identifier: MIT OR Apache-2.0

//! The validated flow export configuration.

use serde::Serialize;
use std::fmt;

/// Record key holding a collector address shared by every node.
pub const SHARED_TARGET_KEY: &str = "sharedTarget";
/// Record key holding a collector port reachable on each node's own address.
pub const NODE_PORT_KEY: &str = "nodePort";
/// Record key holding the flow cache aggregation period.
pub const CACHE_ACTIVE_TIMEOUT_KEY: &str = "cacheActiveTimeout";
/// Record key holding the flow cache size limit.
pub const CACHE_MAX_FLOWS_KEY: &str = "cacheMaxFlows";
/// Record key holding the 1-in-N sampling rate.
pub const SAMPLING_KEY: &str = "sampling";

/// Where and how flow telemetry should be exported.
///
/// A `FlowsConfig` always carries a non-empty `target`; "flow export not
/// configured" is expressed as the absence of a `FlowsConfig`. Each optional field
/// is `None` when it was not specified or could not be parsed, which is distinct
/// from being specified as zero.
///
/// # Examples
///
/// ```
/// use flowscfg::domain::FlowsConfig;
///
/// let config = FlowsConfig::new("1.2.3.4:3030").unwrap().with_sampling(55);
/// assert_eq!(config.target(), "1.2.3.4:3030");
/// assert_eq!(config.sampling, Some(55));
/// assert_eq!(config.cache_max_flows, None);
///
/// assert!(FlowsConfig::new("").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowsConfig {
    /// Collector address, `host:port`. An empty host means the node's own address.
    target: String,

    /// Maximum period, in seconds, during which flows are aggregated before sending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_active_timeout: Option<u64>,

    /// Maximum number of flows in an aggregate; reaching it triggers a send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_max_flows: Option<u32>,

    /// One flow out of `sampling` is sent; 0 disables sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<u32>,
}

impl FlowsConfig {
    /// Creates a configuration for the given collector, or `None` if it is empty.
    pub fn new(target: impl Into<String>) -> Option<Self> {
        let target = target.into();
        if target.is_empty() {
            return None;
        }
        Some(FlowsConfig {
            target,
            cache_active_timeout: None,
            cache_max_flows: None,
            sampling: None,
        })
    }

    /// Returns the collector address.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Sets the cache active timeout, in seconds.
    pub fn with_cache_active_timeout(mut self, seconds: u64) -> Self {
        self.cache_active_timeout = Some(seconds);
        self
    }

    /// Sets the cache flow limit.
    pub fn with_cache_max_flows(mut self, flows: u32) -> Self {
        self.cache_max_flows = Some(flows);
        self
    }

    /// Sets the sampling rate.
    pub fn with_sampling(mut self, sampling: u32) -> Self {
        self.sampling = Some(sampling);
        self
    }
}

impl fmt::Display for FlowsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target={}", self.target)?;
        if let Some(timeout) = self.cache_active_timeout {
            write!(f, " {}={}s", CACHE_ACTIVE_TIMEOUT_KEY, timeout)?;
        }
        if let Some(flows) = self.cache_max_flows {
            write!(f, " {}={}", CACHE_MAX_FLOWS_KEY, flows)?;
        }
        if let Some(sampling) = self.sampling {
            write!(f, " {}={}", SAMPLING_KEY, sampling)?;
        }
        Ok(())
    }
}
