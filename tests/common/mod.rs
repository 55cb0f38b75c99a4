// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities shared by the integration tests.

#![allow(dead_code)]

use flowscfg::domain::{ConfigRecord, FlowsConfigError, FlowsSettings, NamespacedName, Result};
use flowscfg::ports::RecordReader;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// What a [`MockRecordReader`] answers to `get`.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Serve a record with these entries under the requested identity
    Data(BTreeMap<String, String>),
    /// Report that the record does not exist
    NotFound,
    /// Fail with a non-not-found error
    Failure(String),
}

/// A mock record reader that serves one canned reply and counts calls.
#[derive(Debug)]
pub struct MockRecordReader {
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockRecordReader {
    /// Serves the given entries for any requested identity.
    pub fn with_data(entries: &[(&str, &str)]) -> Self {
        let data = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(MockReply::Data(data))
    }

    /// Reports every record as missing.
    pub fn not_found() -> Self {
        Self::new(MockReply::NotFound)
    }

    /// Fails every read.
    pub fn failing(message: &str) -> Self {
        Self::new(MockReply::Failure(message.to_string()))
    }

    fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `get` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordReader for MockRecordReader {
    fn name(&self) -> &str {
        "mock"
    }

    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            MockReply::Data(data) => Ok(ConfigRecord::with_data(name.clone(), data.clone())),
            MockReply::NotFound => Err(FlowsConfigError::RecordNotFound { name: name.clone() }),
            MockReply::Failure(message) => Err(FlowsConfigError::read_error("mock", message.clone())),
        }
    }
}

/// A tracing layer that records the level of every event.
#[derive(Clone, Default)]
pub struct LevelRecorder {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl LevelRecorder {
    /// Levels recorded so far.
    pub fn levels(&self) -> Vec<Level> {
        self.levels.lock().unwrap().clone()
    }

    /// Number of recorded events at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.levels().into_iter().filter(|l| *l == level).count()
    }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.levels.lock().unwrap().push(*event.metadata().level());
    }
}

/// Runs `f` with a subscriber that records log levels, returning both.
pub fn with_recorded_levels<T>(f: impl FnOnce() -> T) -> (T, LevelRecorder) {
    let recorder = LevelRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, recorder)
}

/// Settings used across the integration tests.
pub fn test_settings() -> FlowsSettings {
    FlowsSettings::for_namespace("openshift-network-operator")
}
