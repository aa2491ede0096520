//! Shared test plumbing: a recording NETCONF fake that journals every call
//! a scenario makes against the switch, plus canned switch replies.

#![allow(dead_code)]

use psvm_core::error::PsvmError;
use psvm_core::transport::{NetconfConnector, NetconfTransport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Reply to `show running-config interface port-channel101` as a Nexus 5k
/// emits it: the config embedded as text in the `<data>` element.
pub const SHOW_RUN_INT_REPLY: &str = r#"
<rpc-reply xmlns:ns0="http://www.cisco.com/nxos:1.0:vlan_mgr_cli"
xmlns="urn:ietf:params:xml:ns:netconf:base:1.0"
xmlns:if="http://www.cisco.com/nxos:1.0:if_manager"
xmlns:nxos="http://www.cisco.com/nxos:1.0"
message-id="urn:uuid:2d864580-dd14-11e3-9e69-525400c15717">
  <data>
  !Command: show running-config interface port-channel100
  !Time: Fri May 16 16:07:59 2014

  version 6.0(2)N2(1)

  interface port-channel101
    description openstack2
      switchport mode trunk
        switchport trunk native vlan 134
          switchport trunk allowed vlan 134,137
            spanning-tree port type edge trunk
              speed 1000
                vpc 100

                </data>
                </rpc-reply>
"#;

pub const EMPTY_DATA_REPLY: &str = "<rpc-reply><data></data></rpc-reply>";

/// One call observed on the fake switch, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCall {
    Connect {
        host: String,
        port: u16,
        username: String,
        password: String,
        device_profile: String,
    },
    EditConfig {
        target: String,
        config: String,
    },
    Get {
        filter: String,
    },
    CloseSession,
}

/// Shorthand constructors matching how scenarios build expected sequences.
pub fn connect_call(host: &str, username: &str, password: &str) -> SwitchCall {
    SwitchCall::Connect {
        host: host.to_string(),
        port: 22,
        username: username.to_string(),
        password: password.to_string(),
        device_profile: "nexus".to_string(),
    }
}

pub fn edit_call(config: String) -> SwitchCall {
    SwitchCall::EditConfig {
        target: "running".to_string(),
        config,
    }
}

pub fn get_call(filter: String) -> SwitchCall {
    SwitchCall::Get { filter }
}

/// Scripted behavior for the fake switch.
#[derive(Default)]
pub struct Behavior {
    /// Errors returned by successive connect attempts before connects start
    /// succeeding.
    pub connect_errors: VecDeque<PsvmError>,
    /// `(filter substring, reply)` pairs; first match wins, otherwise an
    /// empty `<data>` reply is returned.
    pub get_replies: Vec<(String, String)>,
    /// `(config substring, error message)` pairs; a matching edit-config
    /// fails with that message as an rpc-error.
    pub edit_errors: Vec<(String, String)>,
}

impl Behavior {
    pub fn with_get_reply(mut self, filter_substr: &str, reply: &str) -> Self {
        self.get_replies
            .push((filter_substr.to_string(), reply.to_string()));
        self
    }

    pub fn with_edit_error(mut self, config_substr: &str, message: &str) -> Self {
        self.edit_errors
            .push((config_substr.to_string(), message.to_string()));
        self
    }

    pub fn with_connect_errors(mut self, errors: Vec<PsvmError>) -> Self {
        self.connect_errors = errors.into();
        self
    }
}

/// Connector whose sessions journal every call into a shared log.
pub struct RecordingConnector {
    calls: Arc<Mutex<Vec<SwitchCall>>>,
    behavior: Arc<Mutex<Behavior>>,
}

impl RecordingConnector {
    pub fn new() -> Arc<Self> {
        Self::with_behavior(Behavior::default())
    }

    pub fn with_behavior(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behavior: Arc::new(Mutex::new(behavior)),
        })
    }

    pub fn calls(&self) -> Vec<SwitchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connect_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SwitchCall::Connect { .. }))
            .count()
    }

    pub fn close_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SwitchCall::CloseSession))
            .count()
    }
}

impl NetconfConnector for RecordingConnector {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        device_profile: &str,
    ) -> Result<Box<dyn NetconfTransport>, PsvmError> {
        self.calls.lock().unwrap().push(SwitchCall::Connect {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
            device_profile: device_profile.to_string(),
        });
        if let Some(err) = self.behavior.lock().unwrap().connect_errors.pop_front() {
            return Err(err);
        }
        Ok(Box::new(RecordingTransport {
            calls: self.calls.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<SwitchCall>>>,
    behavior: Arc<Mutex<Behavior>>,
}

impl NetconfTransport for RecordingTransport {
    fn edit_config(&mut self, target: &str, config: &str) -> Result<(), PsvmError> {
        self.calls.lock().unwrap().push(SwitchCall::EditConfig {
            target: target.to_string(),
            config: config.to_string(),
        });
        let behavior = self.behavior.lock().unwrap();
        for (needle, message) in &behavior.edit_errors {
            if config.contains(needle.as_str()) {
                return Err(PsvmError::RpcError(message.clone()));
            }
        }
        Ok(())
    }

    fn get(&mut self, subtree_filter: &str) -> Result<String, PsvmError> {
        self.calls.lock().unwrap().push(SwitchCall::Get {
            filter: subtree_filter.to_string(),
        });
        let behavior = self.behavior.lock().unwrap();
        for (needle, reply) in &behavior.get_replies {
            if subtree_filter.contains(needle.as_str()) {
                return Ok(reply.clone());
            }
        }
        Ok(EMPTY_DATA_REPLY.to_string())
    }

    fn close_session(&mut self) -> Result<(), PsvmError> {
        self.calls.lock().unwrap().push(SwitchCall::CloseSession);
        Ok(())
    }
}
