pub mod nexus_driver;
pub mod nexus_plugin;
pub mod replies;
pub mod snippets;

pub use nexus_driver::{NexusDriver, NexusSession, SWALLOWABLE_VLAN_STATE_ERRORS};
pub use nexus_plugin::NexusPlugin;
