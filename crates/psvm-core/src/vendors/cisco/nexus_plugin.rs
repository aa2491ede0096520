//! Cisco Nexus implementation of the switch plugin operations.

use crate::config::DriverConfig;
use crate::error::PsvmError;
use crate::interface::InterfaceRef;
use crate::model::Network;
use crate::plugin::SwitchPlugin;
use crate::transport::NetconfConnector;
use crate::vendors::cisco::nexus_driver::NexusDriver;
use crate::vlan_ranges::{compress_ranges, join_tokens};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

/// Ceiling on range tokens per request; larger XML bodies are rejected by
/// the switch.
const CHUNK_LIMIT: usize = 400;

/// Issue `issue` once per batch of at most [`CHUNK_LIMIT`] tokens.
///
/// The stepping mirrors the long-standing provisioning arithmetic: full
/// chunks first, then a trailing partial chunk, with the `start % limit`
/// branch covering the single token left over when the list length is one
/// past a multiple of the limit. Every token is issued exactly once.
fn for_each_chunk<F>(tokens: &[String], mut issue: F) -> Result<(), PsvmError>
where
    F: FnMut(&[String]) -> Result<(), PsvmError>,
{
    if tokens.is_empty() {
        return Ok(());
    }
    let listlen = tokens.len();
    let subqty = listlen / CHUNK_LIMIT;
    let mut start = 0usize;
    let mut end = if subqty > 0 { CHUNK_LIMIT - 1 } else { listlen - 1 };
    for x in 0..subqty {
        issue(&tokens[start..=end])?;
        start = if end + 1 < listlen - 1 { end + 1 } else { listlen - 1 };
        end = if x < subqty - 1 { end + CHUNK_LIMIT } else { listlen - 1 };
    }
    if start != end {
        issue(&tokens[start..=end])?;
    } else if start % CHUNK_LIMIT == 0 {
        issue(&tokens[start..=end])?;
    }
    Ok(())
}

pub struct NexusPlugin {
    driver: NexusDriver,
    keep_vlans: BTreeSet<u16>,
}

impl NexusPlugin {
    pub fn new(driver_config: DriverConfig, keep_vlans: BTreeSet<u16>) -> Self {
        Self {
            driver: NexusDriver::new(driver_config),
            keep_vlans,
        }
    }

    pub fn with_connector(
        driver_config: DriverConfig,
        keep_vlans: BTreeSet<u16>,
        connector: Arc<dyn NetconfConnector>,
    ) -> Self {
        Self {
            driver: NexusDriver::with_connector(driver_config, connector),
            keep_vlans,
        }
    }
}

impl SwitchPlugin for NexusPlugin {
    fn add_vlan_to_switch(&self, interface: &str, vlan: u16) -> Result<(), PsvmError> {
        let intf = InterfaceRef::parse(interface)?;
        let Some(mut session) = self.driver.acquire()? else {
            error!(
                target: "NexusPlugin::add_vlan_to_switch",
                "Cisco Nexus plugin failed: driver failed to connect"
            );
            return Ok(());
        };
        session.create_and_trunk_vlan(&vlan.to_string(), intf.kind, &intf.id)
    }

    fn delete_vlan_from_switch(&self, interface: &str, vlan: u16) -> Result<(), PsvmError> {
        let intf = InterfaceRef::parse(interface)?;
        let Some(mut session) = self.driver.acquire()? else {
            error!(
                target: "NexusPlugin::delete_vlan_from_switch",
                "Cisco Nexus plugin failed: driver failed to connect"
            );
            return Ok(());
        };
        // The VLAN stays defined globally; other interfaces on the switch
        // may still carry it.
        session.disable_vlan_on_trunk(&vlan.to_string(), intf.kind, &intf.id)
    }

    fn sync(&self, interface: &str, networks: &[Network]) -> Result<(), PsvmError> {
        let intf = InterfaceRef::parse(interface)?;
        let interface_name = intf.full_name();

        let Some(mut session) = self.driver.acquire()? else {
            error!(
                target: "NexusPlugin::sync",
                "Cisco Nexus plugin failed: driver failed to connect"
            );
            return Ok(());
        };

        let present = session.interface_vlan_list(&interface_name)?;
        let expected: BTreeSet<u16> = networks.iter().map(|n| n.vlan).collect();

        let missing: BTreeSet<u16> = expected.difference(&present).copied().collect();
        let excess: BTreeSet<u16> = present
            .difference(&expected)
            .filter(|vlan| !self.keep_vlans.contains(vlan))
            .copied()
            .collect();

        // Provision the missing vlans back onto the switch.
        if !missing.is_empty() {
            let tokens = compress_ranges(&missing);
            for_each_chunk(&tokens, |chunk| {
                let expr = join_tokens(chunk);
                session.create_and_trunk_vlan(&expr, intf.kind, &intf.id)
            })?;
            info!(
                target: "NexusPlugin::sync",
                "Missing VLAN(s) {} synced to switch {} for interface {} during this sync",
                join_tokens(&tokens), self.driver.host(), interface_name
            );
        }

        // Remove the excess vlans from the switch port.
        if !excess.is_empty() {
            let tokens = compress_ranges(&excess);
            for_each_chunk(&tokens, |chunk| {
                let expr = join_tokens(chunk);
                session.disable_vlan_on_trunk(&expr, intf.kind, &intf.id)
            })?;
            info!(
                target: "NexusPlugin::sync",
                "Excess VLAN(s) {} removed from switch {} interface {} during this sync",
                join_tokens(&tokens), self.driver.host(), interface_name
            );
        }

        Ok(())
    }
}
