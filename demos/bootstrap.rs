// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot bootstrap of the flow export configuration from a manifest.
//!
//! This example demonstrates:
//! - Reading ConfigMaps from a multi-document YAML manifest
//! - Bootstrapping a typed configuration from the watched record
//! - How missing or invalid entries degrade the result
//!
//! To run this example:
//! ```bash
//! cargo run --example bootstrap --features yaml
//! ```

use flowscfg::prelude::*;

const MANIFEST: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: ovs-flows-config
  namespace: openshift-network-operator
data:
  sharedTarget: 10.0.0.5:2055
  cacheActiveTimeout: 1m30s
  cacheMaxFlows: "100"
  sampling: not-a-number
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: ovs-flows-config
  namespace: staging
data:
  cacheMaxFlows: "50"
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Flow Export Bootstrap ===\n");

    let reader = YamlManifestReader::from_yaml(MANIFEST)?;
    println!("Records in manifest:");
    for name in reader.names() {
        println!("  {}", name);
    }

    for namespace in ["openshift-network-operator", "staging", "missing"] {
        let settings = FlowsSettings::for_namespace(namespace);
        println!("\n--- {} ---", settings.record());
        match ConfigLoader::new(&settings).bootstrap(&reader) {
            Some(config) => {
                println!("  {}", config);
                match serde_yaml::to_string(&config) {
                    Ok(yaml) => print!("{}", yaml),
                    Err(e) => eprintln!("  failed to render: {}", e),
                }
            }
            None => println!("  flow export disabled"),
        }
    }

    Ok(())
}
