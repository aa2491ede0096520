pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod manager;
pub mod model;
pub mod netconf_ssh;
pub mod plugin;
pub mod repository;
pub mod transport;
pub mod vendors;
pub mod vlan_ranges;

// Re-export vendor modules
pub use vendors::cisco;

// Re-export core types
pub use config::{DriverConfig, PsvmConfig, PsvmConfigBuilder};
pub use error::PsvmError;
pub use interface::{InterfaceKind, InterfaceRef};
pub use logging::init_logging;
pub use manager::{HostIdentity, PhysicalSwitchVlanManager};
pub use model::{Network, PortBinding, Switch, SwitchCredential};
pub use netconf_ssh::{Ssh2NetconfConnector, Ssh2NetconfTransport};
pub use plugin::{create_plugin, create_plugin_with_connector, SwitchPlugin};
pub use repository::SwitchRepository;
pub use transport::{NetconfConnector, NetconfTransport};

// Re-export vendor-specific types
pub use vendors::cisco::{NexusDriver, NexusPlugin, NexusSession, SWALLOWABLE_VLAN_STATE_ERRORS};
