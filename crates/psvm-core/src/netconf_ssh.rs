//! NETCONF 1.0 over SSHv2, the way NX-OS speaks it: password auth, the
//! `xmlagent` subsystem, `]]>]]>` end-of-message framing.

use crate::config::DEVICE_PROFILE_NEXUS;
use crate::error::PsvmError;
use crate::transport::{NetconfConnector, NetconfTransport};
use lazy_static::lazy_static;
use regex::Regex;
use ssh2::{Channel, Session};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info};

const NETCONF_DELIMITER: &str = "]]>]]>";

const HELLO: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">\
<capabilities>\
<capability>urn:ietf:params:xml:ns:netconf:base:1.0</capability>\
</capabilities>\
</hello>";

lazy_static! {
    static ref RPC_ERROR_MESSAGE: Regex =
        Regex::new(r"(?s)<error-message[^>]*>(.*?)</error-message>").unwrap();
}

/// Opens [`Ssh2NetconfTransport`] sessions.
pub struct Ssh2NetconfConnector {
    connect_timeout: Duration,
    rpc_timeout: Duration,
}

impl Ssh2NetconfConnector {
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(60), Duration::from_secs(30))
    }

    pub fn with_timeouts(connect_timeout: Duration, rpc_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            rpc_timeout,
        }
    }
}

impl Default for Ssh2NetconfConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl NetconfConnector for Ssh2NetconfConnector {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        device_profile: &str,
    ) -> Result<Box<dyn NetconfTransport>, PsvmError> {
        let addr = format!("{}:{}", host, port);

        debug!(target: "Ssh2NetconfConnector::connect", "Establishing TCP connection to {}", addr);
        let sockaddr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| PsvmError::ConnectionError(format!("Could not resolve {}", addr)))?;
        let tcp = match TcpStream::connect_timeout(&sockaddr, self.connect_timeout) {
            Ok(stream) => stream,
            Err(e) => {
                info!("Failed to establish TCP connection to {}: {}", addr, e);
                return Err(PsvmError::ConnectionError(format!(
                    "Failed to connect to {}: {}",
                    addr, e
                )));
            }
        };
        tcp.set_read_timeout(Some(self.rpc_timeout))?;
        tcp.set_write_timeout(Some(self.rpc_timeout))?;

        debug!(target: "Ssh2NetconfConnector::connect", "Starting SSH handshake");
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;

        debug!(target: "Ssh2NetconfConnector::connect", "Authenticating with username {}", username);
        if let Err(e) = session.userauth_password(username, password) {
            info!("Password authentication failed for {}: {}", username, e);
            return Err(PsvmError::authentication_failed(username, e));
        }

        let subsystem = if device_profile == DEVICE_PROFILE_NEXUS {
            // NX-OS exposes its NETCONF agent under "xmlagent"
            "xmlagent"
        } else {
            "netconf"
        };
        debug!(target: "Ssh2NetconfConnector::connect", "Requesting {} subsystem", subsystem);
        let mut channel = session.channel_session()?;
        channel.subsystem(subsystem)?;

        session.set_blocking(true);

        let mut transport = Ssh2NetconfTransport {
            _session: session,
            channel,
            message_id: 0,
        };
        transport.exchange_hello()?;

        debug!(target: "Ssh2NetconfConnector::connect", "NETCONF session established with {}", host);
        Ok(Box::new(transport))
    }
}

/// A live NETCONF session over one ssh2 channel.
pub struct Ssh2NetconfTransport {
    // Held so the underlying connection outlives the channel.
    _session: Session,
    channel: Channel,
    message_id: u64,
}

impl Ssh2NetconfTransport {
    fn exchange_hello(&mut self) -> Result<(), PsvmError> {
        self.write_framed(HELLO)?;
        let server_hello = self.read_until_delimiter()?;
        debug!(target: "Ssh2NetconfTransport::exchange_hello", "Server hello: {} bytes", server_hello.len());
        Ok(())
    }

    fn write_framed(&mut self, payload: &str) -> Result<(), PsvmError> {
        self.channel.write_all(payload.as_bytes())?;
        self.channel.write_all(NETCONF_DELIMITER.as_bytes())?;
        self.channel.flush()?;
        Ok(())
    }

    /// Read until the end-of-message delimiter. A peer that closes the
    /// channel first surfaces as `SessionClosed` carrying whatever it sent.
    fn read_until_delimiter(&mut self) -> Result<String, PsvmError> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = self.channel.read(&mut chunk)?;
            if n == 0 {
                let payload = String::from_utf8_lossy(&buffer).trim().to_string();
                return Err(PsvmError::SessionClosed(payload));
            }
            buffer.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buffer);
            if let Some(pos) = text.find(NETCONF_DELIMITER) {
                return Ok(text[..pos].to_string());
            }
        }
    }

    fn rpc(&mut self, body: &str) -> Result<String, PsvmError> {
        self.message_id += 1;
        let request = format!(
            "<rpc xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\" message-id=\"{}\">{}</rpc>",
            self.message_id, body
        );
        self.write_framed(&request)?;
        let reply = self.read_until_delimiter()?;
        if reply.contains("<rpc-error") {
            let message = RPC_ERROR_MESSAGE
                .captures(&reply)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| reply.trim().to_string());
            return Err(PsvmError::RpcError(message));
        }
        Ok(reply)
    }
}

impl NetconfTransport for Ssh2NetconfTransport {
    fn edit_config(&mut self, target: &str, config: &str) -> Result<(), PsvmError> {
        // `config` is the complete `<config>...</config>` element already.
        let body = format!(
            "<edit-config><target><{target}/></target>{config}</edit-config>",
            target = target,
            config = config
        );
        self.rpc(&body)?;
        Ok(())
    }

    fn get(&mut self, subtree_filter: &str) -> Result<String, PsvmError> {
        let body = format!(
            "<get><filter type=\"subtree\">{}</filter></get>",
            subtree_filter
        );
        self.rpc(&body)
    }

    fn close_session(&mut self) -> Result<(), PsvmError> {
        let result = self.rpc("<close-session/>");
        let _ = self.channel.send_eof();
        let _ = self.channel.close();
        let _ = self.channel.wait_close();
        result.map(|_| ())
    }
}
