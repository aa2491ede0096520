//! Read-only projections of the records the external store owns.

use serde::{Deserialize, Serialize};

/// Login credentials for one or more switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchCredential {
    pub id: i64,
    pub user_name: String,
    pub password: String,
}

/// A managed physical switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Switch {
    pub id: i64,
    /// Management address; unique across switches.
    pub ip: String,
    pub switch_cred_id: i64,
}

/// Cabling record: compute node `compute_node_id` reaches switch
/// `switch_id` via the interface labelled `switch_port`.
///
/// Several bindings may share a `switch_port` label when a host is
/// dual-homed across switches in a LAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortBinding {
    pub id: i64,
    pub switch_id: i64,
    pub compute_node_id: i64,
    pub switch_port: String,
}

/// Projection of a logical network down to the only field the engine
/// needs: the VLAN id carrying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub vlan: u16,
}
