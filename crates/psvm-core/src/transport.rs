use crate::error::PsvmError;

/// One live NETCONF session to one switch.
///
/// The driver owns exactly one of these per logical operation; every
/// operation on it blocks on a full RPC round-trip. Implementations surface
/// `<rpc-error>` replies as [`PsvmError::RpcError`] and a peer that tears
/// the session down as [`PsvmError::SessionClosed`] carrying whatever
/// payload the peer sent.
pub trait NetconfTransport: Send {
    /// Issue an `edit-config` against the given target datastore. `config`
    /// is the complete `<config>...</config>` body.
    fn edit_config(&mut self, target: &str, config: &str) -> Result<(), PsvmError>;

    /// Issue a `get` with a subtree filter; returns the raw reply XML.
    fn get(&mut self, subtree_filter: &str) -> Result<String, PsvmError>;

    /// Issue `close-session`. Best effort; the session is unusable after.
    fn close_session(&mut self) -> Result<(), PsvmError>;
}

/// Opens NETCONF sessions. The seam the driver tests stand behind.
pub trait NetconfConnector: Send + Sync {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        device_profile: &str,
    ) -> Result<Box<dyn NetconfTransport>, PsvmError>;
}
