//! Flat-file persistence: device documents keyed by hostname and the
//! golden-config capture archive.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::DeviceDocument;

/// Failures of the flat-file stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),
    #[error("device document not found: {0}")]
    NotFound(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(serde_yaml::Error),
}

/// DocumentStore persists one YAML document per device, keyed by hostname.
/// Saving an existing hostname replaces the prior document: the last
/// submission wins, with no merge and no concurrency check.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn document_path(&self, hostname: &str) -> PathBuf {
        self.dir.join(format!("{hostname}.yaml"))
    }

    /// Write the document as `<hostname>.yaml`, creating the directory on
    /// first use and replacing any previous document for the hostname.
    pub fn save(&self, document: &DeviceDocument) -> Result<PathBuf, StoreError> {
        if !is_valid_hostname(&document.hostname) {
            return Err(StoreError::InvalidHostname(document.hostname.clone()));
        }
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.document_path(&document.hostname);
        let yaml = serde_yaml::to_string(document).map_err(StoreError::Serialize)?;
        fs::write(&path, yaml).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Saved device document {}", path.display());
        Ok(path)
    }

    /// Load the stored document for a hostname
    pub fn load(&self, hostname: &str) -> Result<DeviceDocument, StoreError> {
        if !is_valid_hostname(hostname) {
            return Err(StoreError::InvalidHostname(hostname.to_string()));
        }
        let path = self.document_path(hostname);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(hostname.to_string()));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_yaml::from_str(&raw).map_err(|source| StoreError::Parse { path, source })
    }

    /// Hostnames with a stored document, sorted
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut hostnames = list_filenames(&self.dir, "yaml")?
            .into_iter()
            .map(|name| name.trim_end_matches(".yaml").to_string())
            .collect::<Vec<_>>();
        hostnames.sort_unstable();
        Ok(hostnames)
    }
}

/// GoldenStore archives captured running configurations. Every capture gets
/// a timestamped filename and is never overwritten.
#[derive(Debug, Clone)]
pub struct GoldenStore {
    dir: PathBuf,
}

impl GoldenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Archive one capture as `<DEVICE>_<timestamp>.cfg`
    pub fn save(&self, device: &str, config: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let safe_name = device.replace('/', "_");
        let filename = format!("{}_{}.cfg", safe_name, timestamp);
        let path = self.dir.join(&filename);

        fs::write(&path, config).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Archived golden config {}", path.display());
        Ok(path)
    }

    /// Archived capture filenames, most recent first. The timestamp suffix
    /// makes the reverse lexicographic order chronological per device.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut files = list_filenames(&self.dir, "cfg")?;
        files.sort_unstable();
        files.reverse();
        Ok(files)
    }
}

fn list_filenames(dir: &Path, extension: &str) -> Result<Vec<String>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                files.push(name.to_string());
            }
        }
    }
    Ok(files)
}

/// Validate a hostname before it becomes a filename. Allows alphanumeric,
/// hyphens, dots, and underscores. No path separators or shell
/// metacharacters.
fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > 253 {
        return false;
    }
    hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}
