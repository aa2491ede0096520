//! NETCONF driver for one Cisco Nexus switch.
//!
//! A [`NexusDriver`] holds the connection settings; each logical operation
//! acquires a [`NexusSession`] that owns one live NETCONF session and is
//! guaranteed to issue `close-session` when it goes out of scope.

use crate::config::DriverConfig;
use crate::error::PsvmError;
use crate::interface::InterfaceKind;
use crate::netconf_ssh::Ssh2NetconfConnector;
use crate::transport::{NetconfConnector, NetconfTransport};
use crate::vendors::cisco::{replies, snippets};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Transport payload marking the one connect transient worth retrying: the
/// switch has hit its concurrent XML agent session cap.
const XML_SESSION_EXCEEDED: &str = "xml session exceeded max allowed";

const MAX_CONNECT_RETRIES: u32 = 7;

/// Switch error substrings safe to ignore while setting VLAN state. Some
/// NX-OS versions refuse state changes for the extended range (1006-4094),
/// and re-creating an existing VLAN trips the duplicate-name check; the
/// default state is correct in both cases. Matching is substring-over-
/// stringified-error since the agent exposes no machine-readable codes.
pub const SWALLOWABLE_VLAN_STATE_ERRORS: [&str; 3] = [
    "Can't modify state for extended",
    "Command is only allowed on VLAN",
    "VLAN with the same name exists",
];

pub struct NexusDriver {
    config: DriverConfig,
    connector: Arc<dyn NetconfConnector>,
}

impl NexusDriver {
    pub fn new(config: DriverConfig) -> Self {
        let connector = Arc::new(Ssh2NetconfConnector::with_timeouts(
            config.connect_timeout,
            config.rpc_timeout,
        ));
        Self { config, connector }
    }

    /// Build a driver over a caller-supplied transport; the seam the tests
    /// stand behind.
    pub fn with_connector(config: DriverConfig, connector: Arc<dyn NetconfConnector>) -> Self {
        Self { config, connector }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Open one session to the switch.
    ///
    /// A connect failure is the skip sentinel: it is logged and surfaces as
    /// `Ok(None)` so callers proceed without treating it as an error. Any
    /// non-connect failure propagates.
    pub fn acquire(&self) -> Result<Option<NexusSession>, PsvmError> {
        match self.nxos_connect() {
            Ok(transport) => {
                debug!(target: "NexusDriver::acquire", "Connected to switch {}", self.config.host);
                Ok(Some(NexusSession {
                    transport,
                    host: self.config.host.clone(),
                }))
            }
            Err(e) if e.is_connect_failed() => {
                error!(
                    target: "NexusDriver::acquire",
                    "Failed to connect to nexus switch {} with username {}: {}",
                    self.config.host, self.config.username, e
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Make the SSH connection to the switch, retrying the session-exceeded
    /// transient with a jittered backoff.
    fn nxos_connect(&self) -> Result<Box<dyn NetconfTransport>, PsvmError> {
        let mut retries = 0u32;
        loop {
            match self.connector.connect(
                &self.config.host,
                self.config.port,
                &self.config.username,
                &self.config.password,
                &self.config.device_profile,
            ) {
                Ok(transport) => return Ok(transport),
                Err(PsvmError::SessionClosed(payload))
                    if payload.contains(XML_SESSION_EXCEEDED) =>
                {
                    if retries >= MAX_CONNECT_RETRIES {
                        debug!(target: "NexusDriver::nxos_connect", "Retries to connect to nexus exceeded");
                        return Err(PsvmError::ConnectFailed {
                            host: self.config.host.clone(),
                            reason: payload,
                        });
                    }
                    retries += 1;
                    debug!(
                        target: "NexusDriver::nxos_connect",
                        "Retrying connection to nexus, attempt {}", retries
                    );
                    thread::sleep(Duration::from_secs_f64(rand::random::<f64>() + 0.37));
                }
                Err(e) => {
                    error!(
                        target: "NexusDriver::nxos_connect",
                        "Failed to connect to {}: {}", self.config.host, e
                    );
                    return Err(PsvmError::connect_failed(self.config.host.as_str(), &e));
                }
            }
        }
    }
}

/// A live session to one switch. Operations are only available between
/// acquire and drop; dropping closes the session on every exit path.
pub struct NexusSession {
    transport: Box<dyn NetconfTransport>,
    host: String,
}

impl NexusSession {
    /// Modify the running config, optionally ignoring errors that match one
    /// of `allowed_exc_strs`.
    fn edit_config(&mut self, config: &str, allowed_exc_strs: &[&str]) -> Result<(), PsvmError> {
        match self.transport.edit_config("running", config) {
            Ok(()) => Ok(()),
            Err(e) => {
                let text = e.to_string();
                for pattern in allowed_exc_strs {
                    if text.contains(pattern) {
                        debug!(
                            target: "NexusSession::edit_config",
                            "Ignoring switch error matching {:?}: {}", pattern, text
                        );
                        return Ok(());
                    }
                }
                Err(PsvmError::config_failed(config, &e))
            }
        }
    }

    fn get_config(&mut self, subtree_filter: &str) -> Result<String, PsvmError> {
        self.transport
            .get(subtree_filter)
            .map_err(|e| PsvmError::config_failed(subtree_filter, &e))
    }

    /// Create the VLAN(s) in `vlan_expr`, then activate and no-shutdown
    /// them. State errors matching [`SWALLOWABLE_VLAN_STATE_ERRORS`] are
    /// logged and treated as success.
    pub fn create_vlan(&mut self, vlan_expr: &str) -> Result<(), PsvmError> {
        self.edit_config(&snippets::create_vlan(vlan_expr), &[])?;

        let state_config = [
            snippets::vlan_active(vlan_expr),
            snippets::vlan_no_shutdown(vlan_expr),
        ];
        for config in &state_config {
            self.edit_config(config, &SWALLOWABLE_VLAN_STATE_ERRORS)?;
        }
        Ok(())
    }

    /// Delete the VLAN(s) globally on the switch. Never swallows.
    pub fn delete_vlan(&mut self, vlan_expr: &str) -> Result<(), PsvmError> {
        self.edit_config(&snippets::no_vlan(vlan_expr), &[])
    }

    /// Add `vlan_expr` to the trunk allowed list of one interface.
    pub fn enable_vlan_on_trunk(
        &mut self,
        vlan_expr: &str,
        kind: InterfaceKind,
        interface_id: &str,
    ) -> Result<(), PsvmError> {
        let config = snippets::trunk_add(kind, interface_id, vlan_expr);
        debug!(target: "NexusSession::enable_vlan_on_trunk", "{}", config);
        self.edit_config(&config, &[])
    }

    /// Remove `vlan_expr` from the trunk allowed list of one interface.
    pub fn disable_vlan_on_trunk(
        &mut self,
        vlan_expr: &str,
        kind: InterfaceKind,
        interface_id: &str,
    ) -> Result<(), PsvmError> {
        let config = snippets::trunk_remove(kind, interface_id, vlan_expr);
        debug!(target: "NexusSession::disable_vlan_on_trunk", "{}", config);
        self.edit_config(&config, &[])
    }

    /// Create VLAN(s) and trunk them on the specified interface. The trunk
    /// add is issued with the caller's expression as-is.
    pub fn create_and_trunk_vlan(
        &mut self,
        vlan_expr: &str,
        kind: InterfaceKind,
        interface_id: &str,
    ) -> Result<(), PsvmError> {
        self.create_vlan(vlan_expr)?;
        debug!(target: "NexusSession::create_and_trunk_vlan", "Created VLAN(s) {}", vlan_expr);
        self.enable_vlan_on_trunk(vlan_expr, kind, interface_id)
    }

    /// Delete VLAN(s) globally and untrunk them from the specified
    /// interface.
    pub fn delete_and_untrunk_vlan(
        &mut self,
        vlan_expr: &str,
        kind: InterfaceKind,
        interface_id: &str,
    ) -> Result<(), PsvmError> {
        self.delete_vlan(vlan_expr)?;
        self.disable_vlan_on_trunk(vlan_expr, kind, interface_id)
    }

    /// Expanded listing of the VLANs allowed on the named interface.
    pub fn interface_vlan_list(&mut self, full_name: &str) -> Result<BTreeSet<u16>, PsvmError> {
        let reply = self.get_config(&snippets::show_running_interface(full_name))?;
        replies::parse_allowed_vlans(&reply)
    }

    /// Current ports*vlans spanning-tree instance resource usage.
    pub fn span_usage(&mut self) -> Result<Option<String>, PsvmError> {
        let reply = self.get_config(&snippets::show_span_usage())?;
        Ok(replies::parse_span_usage(&reply))
    }
}

impl Drop for NexusSession {
    fn drop(&mut self) {
        match self.transport.close_session() {
            Ok(()) => {
                debug!(target: "NexusSession::drop", "Disconnected from switch {}", self.host)
            }
            Err(e) => {
                warn!(target: "NexusSession::drop", "close-session on {} failed: {}", self.host, e)
            }
        }
    }
}
