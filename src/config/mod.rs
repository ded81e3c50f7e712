use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub docs_dir: String,
    pub golden_dir: String,
    pub inventory_path: String,
    pub ssh_user: String,
    pub ssh_pass: String,
    pub ssh_timeout_secs: u64,
    pub capture_command: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    /// Loaded once at process start, immutable thereafter.
    pub fn load() -> Self {
        Self {
            docs_dir: get_env("DOCS_DIR", "/data/devices"),
            golden_dir: get_env("GOLDEN_DIR", "/data/golden"),
            inventory_path: get_env("INVENTORY_PATH", "/data/inventory.yaml"),
            ssh_user: get_env("SSH_USER", "admin"),
            ssh_pass: get_env("SSH_PASS", "admin"),
            ssh_timeout_secs: get_env("SSH_TIMEOUT", "20").parse().unwrap_or(20),
            capture_command: get_env("CAPTURE_COMMAND", "show running-config"),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Inventory maps device names to their management addresses, loaded from a
/// YAML `NAME: address` mapping. Names are stored uppercase.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    devices: BTreeMap<String, String>,
}

impl Inventory {
    /// Load the device inventory file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inventory {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse inventory {}", path.display()))
    }

    /// Management address for a device; lookup is case-insensitive
    pub fn address(&self, name: &str) -> Option<&str> {
        self.devices.get(&name.to_uppercase()).map(String::as_str)
    }

    /// Known device names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.devices.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("inventory.yaml");
        std::fs::write(&path, "S1: 10.0.0.2\nR1: 10.0.0.4\n").unwrap();

        let inventory = Inventory::load(&path).unwrap();
        assert_eq!(inventory.address("s1"), Some("10.0.0.2"));
        assert_eq!(inventory.address("R1"), Some("10.0.0.4"));
        assert_eq!(inventory.address("R9"), None);
        assert_eq!(inventory.names(), vec!["R1", "S1"]);
    }

    #[test]
    fn test_inventory_load_reports_missing_file() {
        let err = Inventory::load("/nonexistent/inventory.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/inventory.yaml"));
    }
}
