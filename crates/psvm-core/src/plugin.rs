//! Plugin surface the host manager drives, and the selector-based factory
//! that resolves the configured plugin/driver pair.

use crate::config::{DriverConfig, PsvmConfig, CISCO_NEXUS_DRIVER, CISCO_NEXUS_PLUGIN};
use crate::error::PsvmError;
use crate::model::Network;
use crate::transport::NetconfConnector;
use crate::vendors::cisco::NexusPlugin;
use std::sync::Arc;

/// Minimum set of operations a switch plugin must implement.
pub trait SwitchPlugin {
    /// Ensure the VLAN is provisioned on the switch and trunked on the
    /// interface.
    ///
    /// `interface` is a free-form label, e.g. "ethernet1/1" or
    /// "port-channel10"; `vlan` is a 802.1Q id in 1-4094 excluding
    /// switch-specific reserved VLANs.
    fn add_vlan_to_switch(&self, interface: &str, vlan: u16) -> Result<(), PsvmError>;

    /// Remove the VLAN from the interface's trunk allowed list.
    fn delete_vlan_from_switch(&self, interface: &str, vlan: u16) -> Result<(), PsvmError>;

    /// Reconcile the interface's trunk allowed list against the networks
    /// expected on the attached host.
    fn sync(&self, interface: &str, networks: &[Network]) -> Result<(), PsvmError>;
}

/// Resolve the configured plugin for one switch.
pub fn create_plugin(
    config: &PsvmConfig,
    driver_config: DriverConfig,
) -> Result<Box<dyn SwitchPlugin>, PsvmError> {
    check_driver_selector(config)?;
    match config.plugin.as_str() {
        CISCO_NEXUS_PLUGIN => Ok(Box::new(NexusPlugin::new(
            driver_config,
            config.keep_vlans(),
        ))),
        other => Err(PsvmError::UnsupportedPlugin(other.to_string())),
    }
}

/// As [`create_plugin`], but over a caller-supplied transport.
pub fn create_plugin_with_connector(
    config: &PsvmConfig,
    driver_config: DriverConfig,
    connector: Arc<dyn NetconfConnector>,
) -> Result<Box<dyn SwitchPlugin>, PsvmError> {
    check_driver_selector(config)?;
    match config.plugin.as_str() {
        CISCO_NEXUS_PLUGIN => Ok(Box::new(NexusPlugin::with_connector(
            driver_config,
            config.keep_vlans(),
            connector,
        ))),
        other => Err(PsvmError::UnsupportedPlugin(other.to_string())),
    }
}

fn check_driver_selector(config: &PsvmConfig) -> Result<(), PsvmError> {
    match config.driver.as_str() {
        CISCO_NEXUS_DRIVER => Ok(()),
        other => Err(PsvmError::UnsupportedDriver(other.to_string())),
    }
}
