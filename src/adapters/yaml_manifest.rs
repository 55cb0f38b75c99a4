// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML manifest record adapter.
//!
//! This module reads ConfigMap objects out of Kubernetes-style YAML manifests, the
//! same files `kubectl apply -f` or `kubectl get -o yaml` deal with, and serves
//! them through the [`RecordReader`] port.

use crate::domain::{ConfigRecord, FlowsConfigError, NamespacedName, Result};
use crate::ports::{ManifestParser, RecordReader};
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Maximum allowed manifest size (10MB)
const MAX_MANIFEST_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Namespace assumed for objects that do not name one.
const DEFAULT_NAMESPACE: &str = "default";

const READER_NAME: &str = "yaml-manifest";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMeta {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    resource_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ManifestObject {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    data: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(default)]
    items: Option<Vec<serde_yaml::Value>>,
}

/// Parser for YAML manifests.
///
/// Accepts multi-document files and `kind: List` wrappers. Only `ConfigMap`
/// objects become records; other kinds are skipped. Scalar data values are
/// stringified, so an unquoted `nodePort: 3131` reads as `"3131"`. Objects without
/// a `resourceVersion` get a fingerprint of their data instead.
///
/// # Examples
///
/// ```rust
/// use flowscfg::adapters::YamlManifestParser;
/// use flowscfg::ports::ManifestParser;
///
/// let manifest = "
/// apiVersion: v1
/// kind: ConfigMap
/// metadata:
///   name: ovs-flows-config
///   namespace: openshift-network-operator
/// data:
///   nodePort: 3131
/// ";
/// let records = YamlManifestParser::new().parse(manifest).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].get("nodePort"), Some("3131"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlManifestParser;

impl YamlManifestParser {
    /// Creates a new manifest parser.
    pub fn new() -> Self {
        YamlManifestParser
    }

    fn collect(&self, value: serde_yaml::Value, records: &mut Vec<ConfigRecord>) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let object: ManifestObject =
            serde_yaml::from_value(value).map_err(|e| FlowsConfigError::ParseError {
                message: format!("Malformed manifest object: {}", e),
                source: Some(Box::new(e)),
            })?;

        match object.kind.as_deref() {
            Some("ConfigMap") => records.push(Self::to_record(object)?),
            Some("List") => {
                for item in object.items.unwrap_or_default() {
                    self.collect(item, records)?;
                }
            }
            other => {
                tracing::debug!(
                    kind = ?other,
                    name = %object.metadata.name,
                    "Skipping non-ConfigMap manifest object"
                );
            }
        }
        Ok(())
    }

    fn to_record(object: ManifestObject) -> Result<ConfigRecord> {
        if object.metadata.name.is_empty() {
            return Err(FlowsConfigError::ParseError {
                message: "ConfigMap without metadata.name".to_string(),
                source: None,
            });
        }
        let name = NamespacedName::new(
            object.metadata.name,
            object
                .metadata
                .namespace
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        );

        let mut data = BTreeMap::new();
        for (key, value) in object.data.unwrap_or_default() {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    tracing::debug!(record = %name, key = %key, "Skipping non-scalar data value");
                    continue;
                }
            };
            data.insert(key, text);
        }

        let resource_version = object
            .metadata
            .resource_version
            .unwrap_or_else(|| fingerprint(&data));
        Ok(ConfigRecord::with_data(name, data).with_resource_version(resource_version))
    }
}

/// Content-derived version for objects that carry none.
fn fingerprint(data: &BTreeMap<String, String>) -> String {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl ManifestParser for YamlManifestParser {
    fn parse(&self, content: &str) -> Result<Vec<ConfigRecord>> {
        let mut records = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value =
                serde_yaml::Value::deserialize(document).map_err(|e| FlowsConfigError::ParseError {
                    message: format!("Failed to parse YAML: {}", e),
                    source: Some(Box::new(e)),
                })?;
            self.collect(value, &mut records)?;
        }
        Ok(records)
    }
}

/// Reads a manifest file, refusing files over the size limit.
pub(crate) fn read_manifest_file(path: &Path) -> Result<String> {
    let display = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string();

    let metadata = fs::metadata(path).map_err(|e| FlowsConfigError::ReadError {
        reader: READER_NAME.to_string(),
        message: format!("Failed to read file metadata: {}", display),
        source: Some(Box::new(e)),
    })?;
    if metadata.len() > MAX_MANIFEST_FILE_SIZE {
        return Err(FlowsConfigError::read_error(
            READER_NAME,
            format!(
                "Manifest file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_MANIFEST_FILE_SIZE
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| FlowsConfigError::ReadError {
        reader: READER_NAME.to_string(),
        message: format!("Failed to read manifest file: {}", display),
        source: Some(Box::new(e)),
    })
}

fn index(records: Vec<ConfigRecord>) -> HashMap<NamespacedName, ConfigRecord> {
    records
        .into_iter()
        .map(|record| (record.name().clone(), record))
        .collect()
}

/// Record reader backed by a YAML manifest.
///
/// # Examples
///
/// ```rust,no_run
/// use flowscfg::adapters::YamlManifestReader;
/// use flowscfg::domain::FlowsSettings;
/// use flowscfg::service::ConfigLoader;
///
/// let reader = YamlManifestReader::from_file("/etc/flows/ovs-flows-config.yaml").unwrap();
/// let config = ConfigLoader::new(&FlowsSettings::default()).bootstrap(&reader);
/// ```
#[derive(Debug)]
pub struct YamlManifestReader {
    /// Path to the manifest, if read from a file
    file_path: Option<PathBuf>,
    /// Parsed records
    records: RwLock<HashMap<NamespacedName, ConfigRecord>>,
    /// Manifest parser
    parser: YamlManifestParser,
}

impl YamlManifestReader {
    /// Reads the manifest at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let parser = YamlManifestParser::new();
        let records = parser.parse(&read_manifest_file(&file_path)?)?;
        tracing::debug!(
            path = %file_path.display(),
            records = records.len(),
            "Loaded manifest"
        );
        Ok(Self {
            file_path: Some(file_path),
            records: RwLock::new(index(records)),
            parser,
        })
    }

    /// Parses manifest text held in memory.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let parser = YamlManifestParser::new();
        let records = parser.parse(content)?;
        Ok(Self {
            file_path: None,
            records: RwLock::new(index(records)),
            parser,
        })
    }

    /// Returns the manifest path, if read from a file.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns the identities of every record in the manifest.
    pub fn names(&self) -> Vec<NamespacedName> {
        let mut names: Vec<_> = self.records.read().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Re-reads the manifest file. A manifest that fails to parse leaves the
    /// previously loaded records in place.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let records = self.parser.parse(&read_manifest_file(path)?)?;
        *self.records.write().unwrap() = index(records);
        Ok(())
    }
}

impl RecordReader for YamlManifestReader {
    fn name(&self) -> &str {
        READER_NAME
    }

    fn get(&self, name: &NamespacedName) -> Result<ConfigRecord> {
        self.records
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| FlowsConfigError::RecordNotFound { name: name.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FLOWS_MANIFEST: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: ovs-flows-config
  namespace: openshift-network-operator
  resourceVersion: "481"
data:
  sharedTarget: "1.2.3.4:3030"
  cacheActiveTimeout: 3200ms
  cacheMaxFlows: 33
  sampling: "55"
"#;

    fn flows_id() -> NamespacedName {
        NamespacedName::new("ovs-flows-config", "openshift-network-operator")
    }

    #[test]
    fn test_parse_config_map() {
        let records = YamlManifestParser::new().parse(FLOWS_MANIFEST).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name(), &flows_id());
        assert_eq!(record.resource_version(), "481");
        assert_eq!(record.get("sharedTarget"), Some("1.2.3.4:3030"));
        assert_eq!(record.get("cacheActiveTimeout"), Some("3200ms"));
        assert_eq!(record.get("cacheMaxFlows"), Some("33"));
    }

    #[test]
    fn test_parse_multi_document_skips_other_kinds() {
        let content = format!(
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: x\n---\n{}\n---\n",
            FLOWS_MANIFEST
        );
        let records = YamlManifestParser::new().parse(&content).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_list() {
        let content = r#"
apiVersion: v1
kind: List
items:
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: a
  data:
    enabled: true
- apiVersion: v1
  kind: ConfigMap
  metadata:
    name: b
    namespace: ns
"#;
        let records = YamlManifestParser::new().parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), &NamespacedName::new("a", "default"));
        assert_eq!(records[0].get("enabled"), Some("true"));
        assert!(records[1].data().is_empty());
    }

    #[test]
    fn test_missing_resource_version_uses_fingerprint() {
        let content = "kind: ConfigMap\nmetadata:\n  name: a\ndata:\n  k: v\n";
        let first = YamlManifestParser::new().parse(content).unwrap();
        let second = YamlManifestParser::new().parse(content).unwrap();
        assert!(!first[0].resource_version().is_empty());
        assert_eq!(first[0].resource_version(), second[0].resource_version());

        let changed = YamlManifestParser::new()
            .parse("kind: ConfigMap\nmetadata:\n  name: a\ndata:\n  k: w\n")
            .unwrap();
        assert_ne!(first[0].resource_version(), changed[0].resource_version());
    }

    #[test]
    fn test_parse_errors() {
        let parser = YamlManifestParser::new();
        assert!(parser.parse("kind: ConfigMap\nmetadata: {}\n").is_err());
        assert!(parser.parse("kind: [unclosed").is_err());
        assert!(parser.parse("").unwrap().is_empty());
    }

    #[test]
    fn test_reader_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FLOWS_MANIFEST.as_bytes()).unwrap();
        let reader = YamlManifestReader::from_file(file.path()).unwrap();
        assert_eq!(reader.names(), vec![flows_id()]);
        assert_eq!(reader.get(&flows_id()).unwrap().get("sampling"), Some("55"));
        assert!(reader
            .get(&NamespacedName::new("other", "openshift-network-operator"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_reader_reload() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FLOWS_MANIFEST.as_bytes()).unwrap();
        let reader = YamlManifestReader::from_file(file.path()).unwrap();

        fs::write(file.path(), FLOWS_MANIFEST.replace("\"55\"", "\"99\"")).unwrap();
        reader.reload().unwrap();
        assert_eq!(reader.get(&flows_id()).unwrap().get("sampling"), Some("99"));

        fs::write(file.path(), "kind: [broken").unwrap();
        assert!(reader.reload().is_err());
        assert_eq!(reader.get(&flows_id()).unwrap().get("sampling"), Some("99"));
    }

    #[test]
    fn test_reader_missing_file() {
        let err = YamlManifestReader::from_file("/nonexistent/flows.yaml").unwrap_err();
        assert!(matches!(err, FlowsConfigError::ReadError { .. }));
    }

    #[test]
    fn test_reader_from_yaml() {
        let reader = YamlManifestReader::from_yaml(FLOWS_MANIFEST).unwrap();
        assert!(reader.file_path().is_none());
        assert!(reader.reload().is_ok());
        assert_eq!(reader.name(), "yaml-manifest");
    }
}
