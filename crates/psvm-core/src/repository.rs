use crate::error::PsvmError;
use crate::model::{Network, PortBinding, Switch, SwitchCredential};

/// Read-only projection of the external store into the shapes the manager
/// and plugin need.
///
/// Implementations are blocking synchronous calls; pooling and timeouts are
/// the store's concern. Missing rows surface as [`PsvmError::NotFound`].
pub trait SwitchRepository: Send + Sync {
    /// Port bindings whose compute node resolves to `fqdn`.
    fn port_bindings_for_host(&self, fqdn: &str) -> Result<Vec<PortBinding>, PsvmError>;

    fn switch_by_id(&self, id: i64) -> Result<Switch, PsvmError>;

    fn credential_by_id(&self, id: i64) -> Result<SwitchCredential, PsvmError>;

    /// Networks expected on `hostname` according to the control plane.
    fn networks_for_host(&self, hostname: &str) -> Result<Vec<Network>, PsvmError>;
}
