//! Host-side entry point: fans VLAN operations across every switch port
//! cabled to this compute node.

use crate::config::{DriverConfig, PsvmConfig};
use crate::error::PsvmError;
use crate::model::PortBinding;
use crate::plugin::{create_plugin, create_plugin_with_connector, SwitchPlugin};
use crate::repository::SwitchRepository;
use crate::transport::NetconfConnector;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Names this host answers to: the short hostname keys the network
/// projection, the FQDN keys the port bindings.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub hostname: String,
    pub fqdn: String,
}

impl HostIdentity {
    pub fn new(hostname: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            fqdn: fqdn.into(),
        }
    }

    /// Read the identity from the OS. A dotted OS name is taken as the
    /// FQDN; otherwise the short name stands in for both.
    pub fn from_os() -> Result<Self, PsvmError> {
        let name = hostname::get()
            .map_err(PsvmError::IoError)?
            .to_string_lossy()
            .into_owned();
        if let Some((short, _)) = name.split_once('.') {
            Ok(Self::new(short, name.clone()))
        } else {
            warn!(
                target: "HostIdentity::from_os",
                "OS hostname {} is not fully qualified; using it for both names", name
            );
            Ok(Self::new(name.clone(), name))
        }
    }
}

/// Links host-side network lifecycle events to the physical switch plugins
/// so the underlying network plumbing tracks the control plane end to end.
///
/// One instance corresponds to one host-side event and is used by one
/// caller at a time. Construction via [`PhysicalSwitchVlanManager::enter`]
/// yields `None` when the engine is disabled or this host has no port
/// bindings; callers simply skip.
pub struct PhysicalSwitchVlanManager {
    repository: Arc<dyn SwitchRepository>,
    config: PsvmConfig,
    identity: HostIdentity,
    bindings: Vec<PortBinding>,
    connector: Option<Arc<dyn NetconfConnector>>,
}

impl PhysicalSwitchVlanManager {
    pub fn enter(
        repository: Arc<dyn SwitchRepository>,
        config: PsvmConfig,
        identity: HostIdentity,
    ) -> Result<Option<Self>, PsvmError> {
        Self::enter_with_connector(repository, config, identity, None)
    }

    /// As [`enter`](Self::enter), but switch sessions go through the given
    /// transport.
    pub fn enter_with_connector(
        repository: Arc<dyn SwitchRepository>,
        config: PsvmConfig,
        identity: HostIdentity,
        connector: Option<Arc<dyn NetconfConnector>>,
    ) -> Result<Option<Self>, PsvmError> {
        if !config.enabled {
            debug!(target: "PhysicalSwitchVlanManager::enter", "PSVM is disabled");
            return Ok(None);
        }

        let bindings = match repository.port_bindings_for_host(&identity.fqdn) {
            Ok(bindings) => bindings,
            Err(e) if e.is_not_found() => {
                error!(
                    target: "PhysicalSwitchVlanManager::enter",
                    "PSVM: Setup failed for host {}: {}", identity.hostname, e
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        debug!(
            target: "PhysicalSwitchVlanManager::enter",
            "PSVM: setup complete, {} port binding(s) for {}", bindings.len(), identity.fqdn
        );
        Ok(Some(Self {
            repository,
            config,
            identity,
            bindings,
            connector,
        }))
    }

    /// Resolve one binding into a ready plugin and the port label to drive.
    fn switch_details(
        &self,
        binding: &PortBinding,
    ) -> Result<(Box<dyn SwitchPlugin>, String), PsvmError> {
        let switch = self.repository.switch_by_id(binding.switch_id)?;
        let credential = self.repository.credential_by_id(switch.switch_cred_id)?;
        let driver_config = DriverConfig::new(switch.ip, credential.user_name, credential.password);
        let plugin = match &self.connector {
            Some(connector) => {
                create_plugin_with_connector(&self.config, driver_config, connector.clone())?
            }
            None => create_plugin(&self.config, driver_config)?,
        };
        Ok((plugin, binding.switch_port.clone()))
    }

    /// Provision `vlan_id` on every switch port bound to this host.
    pub fn add_vlan_to_switch(&self, vlan_id: u16) -> Result<(), PsvmError> {
        for binding in &self.bindings {
            let (plugin, switch_port) = self.switch_details(binding)?;
            plugin.add_vlan_to_switch(&switch_port, vlan_id).map_err(|e| {
                error!(
                    target: "PhysicalSwitchVlanManager::add_vlan_to_switch",
                    "PSVM: Failed to provision VLAN {} for host {}", vlan_id, self.identity.hostname
                );
                PsvmError::manager(
                    self.identity.hostname.as_str(),
                    format!("failed to provision VLAN {} on {}", vlan_id, switch_port),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Remove `vlan_id` from every switch port bound to this host.
    pub fn delete_vlan_from_switch(&self, vlan_id: u16) -> Result<(), PsvmError> {
        for binding in &self.bindings {
            let (plugin, switch_port) = self.switch_details(binding)?;
            plugin
                .delete_vlan_from_switch(&switch_port, vlan_id)
                .map_err(|e| {
                    error!(
                        target: "PhysicalSwitchVlanManager::delete_vlan_from_switch",
                        "PSVM: Failed to deprovision VLAN {} for host {}",
                        vlan_id, self.identity.hostname
                    );
                    PsvmError::manager(
                        self.identity.hostname.as_str(),
                        format!("failed to deprovision VLAN {} on {}", vlan_id, switch_port),
                        e,
                    )
                })?;
        }
        Ok(())
    }

    /// Reconcile every bound switch port against the networks expected on
    /// this host. The expected set is read once, then applied per binding.
    pub fn sync_physical_network(&self) -> Result<(), PsvmError> {
        let networks = self.repository.networks_for_host(&self.identity.hostname)?;

        for binding in &self.bindings {
            let (plugin, switch_port) = self.switch_details(binding)?;
            plugin.sync(&switch_port, &networks).map_err(|e| {
                error!(
                    target: "PhysicalSwitchVlanManager::sync_physical_network",
                    "PSVM: Failed to sync networks for host {}", self.identity.hostname
                );
                PsvmError::manager(
                    self.identity.hostname.as_str(),
                    format!("failed to sync networks on {}", switch_port),
                    e,
                )
            })?;
        }
        Ok(())
    }
}
