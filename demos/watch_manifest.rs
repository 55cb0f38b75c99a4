// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watches a manifest file and re-bootstraps the flow export configuration
//! whenever the watched record changes.
//!
//! This example demonstrates:
//! - Resolving settings from defaults, `FLOWS_*` variables and flags
//! - Wiring a file watcher to the change filter
//! - Draining reconcile requests and reloading the configuration
//!
//! To run this example:
//! ```bash
//! cargo run --example watch_manifest --features full -- -f /tmp/flows.yaml
//!
//! # In another terminal, modify the manifest:
//! cat > /tmp/flows.yaml <<EOF
//! kind: ConfigMap
//! metadata:
//!   name: ovs-flows-config
//!   namespace: openshift-network-operator
//! data:
//!   nodePort: "3131"
//!   sampling: "100"
//! EOF
//! ```

use flowscfg::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SAMPLE: &str = r#"kind: ConfigMap
metadata:
  name: ovs-flows-config
  namespace: openshift-network-operator
data:
  sharedTarget: 10.0.0.5:2055
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = CommandLineSettings::from_env_args();
    let settings = cli.apply(FlowsSettings::from_env()?)?;

    // Fall back to a sample manifest when none is given
    let _sample;
    let manifest: PathBuf = match cli.manifest() {
        Some(path) => path.to_path_buf(),
        None => {
            let file = tempfile::NamedTempFile::new()?;
            std::fs::write(file.path(), SAMPLE)?;
            let path = file.path().to_path_buf();
            _sample = file;
            path
        }
    };

    println!("=== Flow Export Manifest Watcher ===\n");
    println!("Manifest: {}", manifest.display());
    println!("Record:   {}", settings.record());
    println!("Consumer: {}\n", settings.consumer());

    let reader = YamlManifestReader::from_file(&manifest)?;
    let loader = ConfigLoader::new(&settings);
    report(loader.bootstrap(&reader));

    let (tx, rx) = mpsc::channel::<ReconcileRequest>();
    let tx = Mutex::new(tx);
    let mut watcher = ManifestFileWatcher::new(&manifest, Some(Duration::from_secs(1)))?;
    watch_for_record(
        &mut watcher,
        ChangeFilter::new(&settings),
        Arc::new(move |request: ReconcileRequest| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(request);
            }
        }),
    )?;

    println!("\nWaiting for changes for one minute. Press Ctrl+C to exit.");
    let deadline = std::time::Instant::now() + Duration::from_secs(60);
    while std::time::Instant::now() < deadline {
        let Ok(request) = rx.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        println!("\nReconcile requested for {}", request);
        if let Err(e) = reader.reload() {
            eprintln!("Failed to reload manifest: {}", e);
            continue;
        }
        report(loader.bootstrap(&reader));
    }

    watcher.stop()?;
    println!("\nWatcher stopped.");
    Ok(())
}

fn report(config: Option<FlowsConfig>) {
    match config {
        Some(config) => println!("Flow export: {}", config),
        None => println!("Flow export disabled"),
    }
}
