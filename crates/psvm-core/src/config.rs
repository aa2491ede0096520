use crate::error::PsvmError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Device profile string sent to the transport for Cisco Nexus switches.
pub const DEVICE_PROFILE_NEXUS: &str = "nexus";

/// Selector for the bundled Cisco Nexus plugin.
pub const CISCO_NEXUS_PLUGIN: &str = "cisco.nexus.plugin";

/// Selector for the bundled Cisco Nexus driver.
pub const CISCO_NEXUS_DRIVER: &str = "cisco.nexus.driver";

/// Operator-facing configuration for the switch VLAN manager.
///
/// Field names follow the host configuration keys; everything is read-only
/// after initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsvmConfig {
    /// Master enable gate. The manager refuses to come up without it.
    #[serde(rename = "psvm", default)]
    pub enabled: bool,

    /// Plugin used to manage the switches bound to this host.
    #[serde(rename = "psvm_plugin", default = "default_plugin")]
    pub plugin: String,

    /// Driver the plugin drives the switch with.
    #[serde(rename = "psvm_driver", default = "default_driver")]
    pub driver: String,

    /// VLANs to bypass during sync so they do not get inadvertently
    /// removed, i.e. the native VLAN.
    #[serde(rename = "psvm_ignore_vlans", default = "default_ignore_vlans")]
    pub ignore_vlans: Vec<u16>,
}

fn default_plugin() -> String {
    CISCO_NEXUS_PLUGIN.to_string()
}

fn default_driver() -> String {
    CISCO_NEXUS_DRIVER.to_string()
}

fn default_ignore_vlans() -> Vec<u16> {
    vec![1]
}

impl Default for PsvmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            plugin: default_plugin(),
            driver: default_driver(),
            ignore_vlans: default_ignore_vlans(),
        }
    }
}

impl PsvmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for PsvmConfig to allow fluent configuration
    pub fn builder() -> PsvmConfigBuilder {
        PsvmConfigBuilder::default()
    }

    /// The keep set: VLANs that must never be removed from a trunk by sync.
    pub fn keep_vlans(&self) -> BTreeSet<u16> {
        self.ignore_vlans.iter().copied().collect()
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &str) -> Result<Self, PsvmError> {
        let path = Path::new(path);
        if !path.exists() {
            return Err(PsvmError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::load_from_json(&content)?;
        debug!(target: "PsvmConfig::load_from_file", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn load_from_json(json: &str) -> Result<Self, PsvmError> {
        serde_json::from_str::<PsvmConfig>(json)
            .map_err(|e| PsvmError::ConfigError(format!("Failed to parse JSON config: {}", e)))
    }
}

/// Builder for PsvmConfig to allow fluent configuration
#[derive(Default)]
pub struct PsvmConfigBuilder {
    config: PsvmConfig,
}

impl PsvmConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn plugin(mut self, plugin: String) -> Self {
        self.config.plugin = plugin;
        self
    }

    pub fn driver(mut self, driver: String) -> Self {
        self.config.driver = driver;
        self
    }

    pub fn ignore_vlans(mut self, vlans: Vec<u16>) -> Self {
        self.config.ignore_vlans = vlans;
        self
    }

    pub fn build(self) -> PsvmConfig {
        self.config
    }
}

/// Connection settings for one switch, held only for the duration of a
/// session.
#[derive(Clone)]
pub struct DriverConfig {
    /// Hostname or IP address of the switch
    pub host: String,

    /// Username to authenticate with
    pub username: String,

    /// Password for authentication
    pub password: String,

    /// SSH port (default: 22)
    pub port: u16,

    /// Device profile selecting the transport dialect (default: "nexus")
    pub device_profile: String,

    /// TCP connect timeout (default: 60s)
    pub connect_timeout: Duration,

    /// Timeout for a single RPC round-trip (default: 30s)
    pub rpc_timeout: Duration,
}

impl DriverConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            port: 22,
            device_profile: DEVICE_PROFILE_NEXUS.to_string(),
            connect_timeout: Duration::from_secs(60),
            rpc_timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("device_profile", &self.device_profile)
            .finish()
    }
}
