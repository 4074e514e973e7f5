//! Exported app configuration
//!
//! "Export config" on an installed app downloads a YAML or JSON file. The
//! scenario reads it back, checks it has the expected shape and compares
//! individual fields.

use crate::error::{E2eError, Result};
use crate::wait::poll_until;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Shape of an exported app configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppExport {
    pub template_name: String,
    pub template_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub input: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Yaml,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(E2eError::Parse(format!(
                "Unknown export format for {}",
                path.display()
            ))),
        }
    }
}

impl AppExport {
    /// Parse and validate exported content.
    pub fn parse(content: &str, format: ExportFormat) -> Result<Self> {
        let export: AppExport = match format {
            ExportFormat::Yaml => serde_yaml::from_str(content)?,
            ExportFormat::Json => serde_json::from_str(content)?,
        };
        if export.template_name.trim().is_empty() {
            return Err(E2eError::Assertion(
                "exported template_name is empty".to_string(),
            ));
        }
        if export.template_version.trim().is_empty() {
            return Err(E2eError::Assertion(
                "exported template_version is empty".to_string(),
            ));
        }
        Ok(export)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let format = ExportFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Whole export as JSON, for dotted-path lookups.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Value at a dotted path such as `"input.preset.name"`.
    pub fn field(&self, path: &str) -> Option<Value> {
        let root = self.to_value();
        path.split('.')
            .try_fold(&root, |v, key| v.get(key))
            .cloned()
    }

    /// Fail unless the field at `path` equals `expected`.
    pub fn expect_field(&self, path: &str, expected: impl Into<Value>) -> Result<()> {
        let expected = expected.into();
        match self.field(path) {
            Some(actual) if actual == expected => Ok(()),
            actual => Err(E2eError::mismatch(
                format!("exported field {}", path),
                expected,
                actual,
            )),
        }
    }
}

/// Finished downloads in `dir` whose names start with `prefix`.
///
/// Chrome writes `*.crdownload` while the transfer is in progress; those
/// are not listed. A missing directory lists nothing.
pub fn existing_downloads(dir: &Path, prefix: &str) -> HashSet<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return HashSet::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.starts_with(prefix) && !name.ends_with(".crdownload")
        })
        .collect()
}

/// Wait for a finished download whose name starts with `prefix` and that
/// is not in `before`.
///
/// Take `before` with [`existing_downloads`] right before triggering the
/// download. When several new files match, the most recently modified one
/// wins.
pub async fn wait_for_download(
    dir: &Path,
    prefix: &str,
    before: &HashSet<PathBuf>,
    timeout: Duration,
    interval: Duration,
) -> Result<PathBuf> {
    let mut found = None;
    poll_until(
        &format!("new download {}* in {}", prefix, dir.display()),
        timeout,
        interval,
        || {
            let hit = find_new_download(dir, prefix, before);
            let ready = hit.is_some();
            if hit.is_some() {
                found = hit;
            }
            async move { Ok(ready) }
        },
    )
    .await?;
    found.ok_or_else(|| E2eError::Other(format!("download {} vanished", prefix)))
}

fn find_new_download(dir: &Path, prefix: &str, before: &HashSet<PathBuf>) -> Option<PathBuf> {
    existing_downloads(dir, prefix)
        .into_iter()
        .filter(|path| !before.contains(path))
        .max_by_key(|path| {
            std::fs::metadata(path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        })
}
