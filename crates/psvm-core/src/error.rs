use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PsvmError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("SSH error: {0}")]
    SshError(#[from] ssh2::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed for user {username}: {source}")]
    AuthenticationFailed {
        username: String,
        #[source]
        source: ssh2::Error,
    },

    #[error("Session closed by peer: {0}")]
    SessionClosed(String),

    #[error("RPC error from switch: {0}")]
    RpcError(String),

    #[error("Failed to connect to nexus switch {host}: {reason}")]
    ConnectFailed { host: String, reason: String },

    #[error("Failed to apply config on nexus switch: {reason}; config was: {config}")]
    ConfigFailed { config: String, reason: String },

    #[error("Unsupported interface kind for label: {0}")]
    UnsupportedInterfaceKind(String),

    #[error("Invalid vlan expression: {0}")]
    InvalidVlanExpression(String),

    #[error("Unsupported plugin selector: {0}")]
    UnsupportedPlugin(String),

    #[error("Unsupported driver selector: {0}")]
    UnsupportedDriver(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("PSVM manager failed on host {host}: {context}")]
    ManagerError {
        host: String,
        context: String,
        #[source]
        source: Box<PsvmError>,
    },
}

// Helper methods for error context
impl PsvmError {
    pub fn authentication_failed(username: impl Into<String>, err: ssh2::Error) -> Self {
        Self::AuthenticationFailed {
            username: username.into(),
            source: err,
        }
    }

    pub fn connect_failed(host: impl Into<String>, cause: &PsvmError) -> Self {
        Self::ConnectFailed {
            host: host.into(),
            reason: cause.to_string(),
        }
    }

    pub fn config_failed(config: impl Into<String>, cause: &PsvmError) -> Self {
        Self::ConfigFailed {
            config: config.into(),
            reason: cause.to_string(),
        }
    }

    pub fn manager(
        host: impl Into<String>,
        context: impl Into<String>,
        cause: PsvmError,
    ) -> Self {
        Self::ManagerError {
            host: host.into(),
            context: context.into(),
            source: Box::new(cause),
        }
    }

    /// True for the skip sentinel the plugin layer turns into a logged no-op.
    pub fn is_connect_failed(&self) -> bool {
        matches!(self, Self::ConnectFailed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
