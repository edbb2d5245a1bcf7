//! Configuration model for the weft plugin.
//!
//! Configuration is an explicit value constructed once per invocation and
//! passed into every component constructor; there is no ambient global
//! client state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, WeftError};

/// Root configuration for one plugin invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    /// Base URL of the SDN controller API.
    pub api_endpoint: String,
    /// Base URL of the local dataplane agent.
    pub agent_endpoint: String,
    /// Directory holding named network namespace links.
    pub netns_dir: PathBuf,
    /// Host device whose address identifies this node on the overlay.
    pub overlay_device: String,
    /// Logical network name pods attach to.
    pub network_name: String,
    /// Subnet attached to the network on first creation.
    pub subnet: String,
    /// Interface name presented inside the container namespace.
    pub interface_name: String,
}

impl Default for WeftConfig {
    fn default() -> Self {
        Self {
            api_endpoint: constants::DEFAULT_API_ENDPOINT.to_string(),
            agent_endpoint: constants::DEFAULT_AGENT_ENDPOINT.to_string(),
            netns_dir: PathBuf::from(constants::NETNS_DIR),
            overlay_device: constants::OVERLAY_DEVICE.to_string(),
            network_name: constants::DEFAULT_NETWORK.to_string(),
            subnet: constants::DEFAULT_SUBNET.to_string(),
            interface_name: constants::CONTAINER_IFNAME.to_string(),
        }
    }
}

impl WeftConfig {
    /// Loads configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WeftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_populated() {
        let config = WeftConfig::default();
        assert_eq!(config.network_name, "default");
        assert_eq!(config.subnet, "10.0.0.0/8");
        assert_eq!(config.interface_name, "veth0");
        assert_eq!(config.netns_dir, PathBuf::from("/var/run/netns"));
    }

    #[test]
    fn load_applies_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"{{"api_endpoint": "http://controller:8082"}}"#).expect("write");

        let config = WeftConfig::load(file.path()).expect("load");
        assert_eq!(config.api_endpoint, "http://controller:8082");
        assert_eq!(config.network_name, "default");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = WeftConfig::load(Path::new("/nonexistent/weft.json"));
        assert!(err.is_err());
    }
}
