// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for manifest changes.
//!
//! This module provides a watcher that monitors a manifest file, re-parses it when
//! it is modified, and reports the records that appeared, changed or disappeared
//! as change events.

use crate::adapters::yaml_manifest::{read_manifest_file, YamlManifestParser};
use crate::domain::{ChangeEvent, ConfigRecord, FlowsConfigError, NamespacedName, Result};
use crate::ports::{EventCallback, ManifestParser, RecordWatcher};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Snapshot = HashMap<NamespacedName, ConfigRecord>;

/// Computes the events that turn `old` into `new`, ordered by record identity.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Vec<ChangeEvent> {
    let mut names: Vec<&NamespacedName> = old.keys().chain(new.keys()).collect();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .filter_map(|name| match (old.get(name), new.get(name)) {
            (None, Some(created)) => Some(ChangeEvent::Created(Some(created.object_ref()))),
            (Some(deleted), None) => Some(ChangeEvent::Deleted(Some(deleted.object_ref()))),
            (Some(before), Some(after)) if before != after => Some(ChangeEvent::Updated {
                old: Some(before.object_ref()),
                new: Some(after.object_ref()),
            }),
            _ => None,
        })
        .collect()
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let records = YamlManifestParser::new().parse(&read_manifest_file(path)?)?;
    Ok(records
        .into_iter()
        .map(|record| (record.name().clone(), record))
        .collect())
}

/// File system watcher for manifest files.
///
/// Events are debounced on the trailing edge: the manifest is re-read once no
/// change to it has been seen for the debounce delay, so the half-written states
/// of a save are never reported. A manifest that fails to parse is logged and skipped; the last good snapshot
/// stays the baseline for the next change.
///
/// # Examples
///
/// ```rust,no_run
/// use flowscfg::adapters::ManifestFileWatcher;
/// use flowscfg::domain::ChangeEvent;
/// use flowscfg::ports::RecordWatcher;
/// use std::sync::Arc;
///
/// # fn main() -> flowscfg::domain::Result<()> {
/// let mut watcher = ManifestFileWatcher::new("/etc/flows/manifest.yaml", None)?;
///
/// watcher.watch(Arc::new(|event: ChangeEvent| {
///     println!("Manifest changed: {:?}", event);
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ManifestFileWatcher {
    /// Path to the manifest being watched
    file_path: PathBuf,
    /// Debounce delay (default 500ms)
    debounce_delay: Duration,
    /// Records as of the last successful parse
    snapshot: Arc<Mutex<Snapshot>>,
    /// Internal watcher
    watcher: Option<RecommendedWatcher>,
    /// Thread handle for the watcher thread
    watch_thread: Option<JoinHandle<()>>,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
}

impl ManifestFileWatcher {
    /// Creates a watcher for the manifest at `path` and loads its current records.
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let file_path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| FlowsConfigError::WatcherError {
                message: format!("File does not exist: {}", path.as_ref().display()),
                source: Some(Box::new(e)),
            })?;
        let snapshot = load_snapshot(&file_path)?;

        Ok(Self {
            file_path,
            debounce_delay: debounce_delay.unwrap_or(Duration::from_millis(500)),
            snapshot: Arc::new(Mutex::new(snapshot)),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// Returns the watched path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Re-reads the manifest and emits the differences from the last snapshot.
fn rescan(file_path: &Path, snapshot: &Mutex<Snapshot>, callback: &EventCallback) {
    let current = match load_snapshot(file_path) {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(
                path = %file_path.display(),
                error = %e,
                "Failed to re-read manifest, keeping previous records"
            );
            return;
        }
    };
    let events = {
        let mut previous = snapshot.lock().unwrap();
        let events = diff_snapshots(&previous, &current);
        *previous = current;
        events
    };
    tracing::debug!(
        path = %file_path.display(),
        events = events.len(),
        "Manifest changed"
    );
    for event in events {
        callback(event);
    }
}

impl RecordWatcher for ManifestFileWatcher {
    fn watch(&mut self, callback: EventCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(FlowsConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel::<notify::Result<Event>>();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                FlowsConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        // Watch the parent directory; editors often replace the file itself
        let watch_path = self
            .file_path
            .parent()
            .ok_or_else(|| FlowsConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?
            .to_path_buf();

        watcher
            .watch(&watch_path, RecursiveMode::NonRecursive)
            .map_err(|e| FlowsConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);

        let file_path = self.file_path.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let debounce_delay = self.debounce_delay;

        let watch_thread = thread::spawn(move || {
            watch_loop(&file_path, &snapshot, debounce_delay, &event_rx, &stop_rx, &callback)
        });
        self.watch_thread = Some(watch_thread);

        tracing::debug!(path = %self.file_path.display(), "Watching manifest");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| FlowsConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        self.watcher = None;
        Ok(())
    }
}

fn watch_loop(
    file_path: &Path,
    snapshot: &Mutex<Snapshot>,
    debounce_delay: Duration,
    event_rx: &Receiver<notify::Result<Event>>,
    stop_rx: &Receiver<()>,
    callback: &EventCallback,
) {
    let tick = debounce_delay.clamp(Duration::from_millis(10), Duration::from_millis(100));
    // time of the latest event for the file not yet followed by a rescan
    let mut pending_since: Option<Instant> = None;

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match event_rx.recv_timeout(tick) {
            Ok(Ok(event)) if event.paths.iter().any(|p| p == file_path) => {
                pending_since = Some(Instant::now());
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }

        // rescan only once the burst has gone quiet, so the last write wins
        if let Some(last_event) = pending_since {
            if last_event.elapsed() >= debounce_delay {
                pending_since = None;
                rescan(file_path, snapshot, callback);
            }
        }
    }
}

impl Drop for ManifestFileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn manifest(sampling: &str) -> String {
        format!(
            "kind: ConfigMap\nmetadata:\n  name: ovs-flows-config\n  namespace: ns\ndata:\n  nodePort: \"3131\"\n  sampling: \"{}\"\n",
            sampling
        )
    }

    fn snapshot_of(content: &str) -> Snapshot {
        YamlManifestParser::new()
            .parse(content)
            .unwrap()
            .into_iter()
            .map(|r| (r.name().clone(), r))
            .collect()
    }

    #[test]
    fn test_diff_snapshots() {
        let empty = Snapshot::new();
        let v1 = snapshot_of(&manifest("1"));
        let v2 = snapshot_of(&manifest("2"));

        assert!(matches!(
            diff_snapshots(&empty, &v1).as_slice(),
            [ChangeEvent::Created(Some(_))]
        ));
        assert!(matches!(
            diff_snapshots(&v1, &v2).as_slice(),
            [ChangeEvent::Updated { .. }]
        ));
        assert!(matches!(
            diff_snapshots(&v2, &empty).as_slice(),
            [ChangeEvent::Deleted(Some(_))]
        ));
        assert!(diff_snapshots(&v1, &v1).is_empty());
    }

    #[test]
    fn test_new_requires_existing_parsable_file() {
        assert!(ManifestFileWatcher::new("/nonexistent/path/flows.yaml", None).is_err());

        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "kind: [broken").unwrap();
        assert!(ManifestFileWatcher::new(file.path(), None).is_err());
    }

    #[test]
    fn test_watch_and_stop() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), manifest("1")).unwrap();
        let mut watcher = ManifestFileWatcher::new(file.path(), None).unwrap();

        let callback: EventCallback = Arc::new(|_event: ChangeEvent| {});
        assert!(watcher.watch(Arc::clone(&callback)).is_ok());
        assert!(watcher.watch(callback).is_err());
        assert!(watcher.stop().is_ok());
    }

    #[test]
    fn test_rescan_emits_update_and_keeps_snapshot_on_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), manifest("1")).unwrap();
        let watcher = ManifestFileWatcher::new(file.path(), None).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: EventCallback = Arc::new(move |e: ChangeEvent| sink.lock().unwrap().push(e));

        fs::write(file.path(), "kind: [broken").unwrap();
        rescan(watcher.file_path(), &watcher.snapshot, &callback);
        assert!(seen.lock().unwrap().is_empty());

        fs::write(file.path(), manifest("2")).unwrap();
        rescan(watcher.file_path(), &watcher.snapshot, &callback);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(matches!(seen.lock().unwrap()[0], ChangeEvent::Updated { .. }));
    }

    fn sampling_in(watcher: &ManifestFileWatcher) -> Option<String> {
        watcher
            .snapshot
            .lock()
            .unwrap()
            .values()
            .next()
            .and_then(|record| record.get("sampling").map(str::to_string))
    }

    #[test]
    fn test_burst_of_writes_reports_final_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows.yaml");
        fs::write(&path, manifest("1")).unwrap();

        let mut watcher = ManifestFileWatcher::new(&path, Some(Duration::from_millis(300))).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        watcher
            .watch(Arc::new(move |e: ChangeEvent| sink.lock().unwrap().push(e)))
            .unwrap();

        // Wait for watcher to initialize
        thread::sleep(Duration::from_millis(100));

        fs::write(&path, manifest("2")).unwrap();
        thread::sleep(Duration::from_millis(80));
        fs::write(&path, manifest("3")).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while seen.lock().unwrap().is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        // leave room for a late second rescan to show up
        thread::sleep(Duration::from_millis(500));
        watcher.stop().unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1, "events: {:?}", *events);
        assert!(matches!(events[0], ChangeEvent::Updated { .. }));
        assert_eq!(sampling_in(&watcher).as_deref(), Some("3"));
    }

    #[test]
    fn test_custom_debounce() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), manifest("1")).unwrap();
        let watcher =
            ManifestFileWatcher::new(file.path(), Some(Duration::from_secs(1))).unwrap();
        assert_eq!(watcher.debounce_delay, Duration::from_secs(1));
    }
}
