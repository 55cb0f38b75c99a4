// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for bootstrapping the flow export configuration.
//!
//! These tests run the loader against mock and in-memory stores and check both
//! the returned configuration and what gets logged on the way.

mod common;

use common::{test_settings, with_recorded_levels, MockRecordReader};
use flowscfg::adapters::InMemoryRecordStore;
use flowscfg::domain::{FlowsConfig, NamespacedName};
use flowscfg::service::ConfigLoader;
use tracing::Level;

#[test]
fn test_bootstrap_shared_target() {
    let reader = MockRecordReader::with_data(&[
        ("sharedTarget", "1.2.3.4:3030"),
        ("cacheActiveTimeout", "3200ms"),
        ("cacheMaxFlows", "33"),
        ("sampling", "55"),
    ]);

    let config = ConfigLoader::new(&test_settings()).bootstrap(&reader).unwrap();

    assert_eq!(config.target(), "1.2.3.4:3030");
    // the extra 200ms are truncated
    assert_eq!(config.cache_active_timeout, Some(3));
    assert_eq!(config.cache_max_flows, Some(33));
    assert_eq!(config.sampling, Some(55));
}

#[test]
fn test_bootstrap_node_port() {
    let reader = MockRecordReader::with_data(&[
        ("nodePort", "3131"),
        ("cacheActiveTimeout", "invalid timeout"),
        ("cacheMaxFlows", "invalid int"),
    ]);

    let config = ConfigLoader::new(&test_settings()).bootstrap(&reader).unwrap();

    assert_eq!(config.target(), ":3131");
    // invalid or unspecified fields are ignored
    assert_eq!(config.cache_active_timeout, None);
    assert_eq!(config.cache_max_flows, None);
    assert_eq!(config.sampling, None);
}

#[test]
fn test_bootstrap_incomplete_record() {
    let reader = MockRecordReader::with_data(&[
        ("cacheActiveTimeout", "3200ms"),
        ("cacheMaxFlows", "33"),
        ("sampling", "55"),
    ]);

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    // without sharedTarget nor nodePort, flow collection can't be set
    assert!(config.is_none());
    assert!(logs.count(Level::WARN) >= 1);
}

#[test]
fn test_bootstrap_missing_record_is_silent() {
    let reader = MockRecordReader::not_found();

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    assert!(config.is_none());
    assert_eq!(logs.count(Level::WARN), 0);
    assert_eq!(logs.count(Level::ERROR), 0);
    assert_eq!(reader.calls(), 1);
}

#[test]
fn test_bootstrap_read_failure_warns() {
    let reader = MockRecordReader::failing("configmaps is forbidden");

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    assert!(config.is_none());
    assert_eq!(logs.count(Level::WARN), 1);
    // no retries
    assert_eq!(reader.calls(), 1);
}

#[test]
fn test_bootstrap_truncation_is_a_notice() {
    let reader = MockRecordReader::with_data(&[
        ("sharedTarget", "1.2.3.4:3030"),
        ("cacheActiveTimeout", "1500ms"),
    ]);

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    assert_eq!(config.unwrap().cache_active_timeout, Some(1));
    assert_eq!(logs.count(Level::WARN), 0);
    assert!(logs.count(Level::INFO) >= 1);
}

#[test]
fn test_bootstrap_whole_seconds_accepted_quietly() {
    let reader = MockRecordReader::with_data(&[
        ("sharedTarget", "collector:2055"),
        ("cacheActiveTimeout", "1m30s"),
        ("sampling", "0"),
    ]);

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    let config = config.unwrap();
    assert_eq!(config.cache_active_timeout, Some(90));
    // zero is a value, not "unset"
    assert_eq!(config.sampling, Some(0));
    assert_eq!(logs.count(Level::WARN), 0);
    assert_eq!(logs.count(Level::INFO), 0);
}

#[test]
fn test_bootstrap_each_invalid_field_warns() {
    let reader = MockRecordReader::with_data(&[
        ("nodePort", "3131"),
        ("cacheActiveTimeout", "soon"),
        ("cacheMaxFlows", "-1"),
        ("sampling", "99999999999"),
    ]);

    let (config, logs) =
        with_recorded_levels(|| ConfigLoader::new(&test_settings()).bootstrap(&reader));

    assert_eq!(config, FlowsConfig::new(":3131"));
    assert_eq!(logs.count(Level::WARN), 3);
}

#[test]
fn test_bootstrap_is_idempotent() {
    let reader = MockRecordReader::with_data(&[
        ("sharedTarget", "1.2.3.4:3030"),
        ("cacheActiveTimeout", "3200ms"),
        ("sampling", "bad"),
    ]);
    let loader = ConfigLoader::new(&test_settings());

    let first = loader.bootstrap(&reader);
    let second = loader.bootstrap(&reader);

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_bootstrap_reads_configured_identity() {
    let store = InMemoryRecordStore::new();
    store.apply(
        NamespacedName::new("ovs-flows-config", "openshift-network-operator"),
        [("sharedTarget", "default-ns:1")],
    );
    store.apply(
        NamespacedName::new("ovs-flows-config", "staging"),
        [("sharedTarget", "staging-ns:1")],
    );

    let default_config = ConfigLoader::new(&test_settings()).bootstrap(&store).unwrap();
    let staging_config = ConfigLoader::new(&flowscfg::domain::FlowsSettings::for_namespace("staging"))
        .bootstrap(&store)
        .unwrap();

    assert_eq!(default_config.target(), "default-ns:1");
    assert_eq!(staging_config.target(), "staging-ns:1");
}

#[test]
fn test_bootstrap_follows_store_updates_and_deletes() {
    let settings = test_settings();
    let store = InMemoryRecordStore::new();
    let loader = ConfigLoader::new(&settings);

    store.apply(settings.record().clone(), [("nodePort", "3131")]);
    assert_eq!(loader.bootstrap(&store).unwrap().target(), ":3131");

    store.apply(
        settings.record().clone(),
        [("sharedTarget", "10.1.1.1:2055"), ("nodePort", "3131")],
    );
    assert_eq!(loader.bootstrap(&store).unwrap().target(), "10.1.1.1:2055");

    store.delete(settings.record());
    assert!(loader.bootstrap(&store).is_none());
}
