use crate::error::PsvmError;
use std::fmt::{Display, Formatter};

/// The two interface families the Nexus XML schemas distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// Physical ethernet port, e.g. ethernet1/3
    Ethernet,
    /// Logical link aggregate, e.g. port-channel101
    PortChannel,
}

impl InterfaceKind {
    /// Canonical name used to reconstruct the full interface label.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            InterfaceKind::Ethernet => "ethernet",
            InterfaceKind::PortChannel => "port-channel",
        }
    }

    /// `__XML__MODE_*` tag the trunk snippets nest the switchport config in.
    pub fn xml_mode(&self) -> &'static str {
        match self {
            InterfaceKind::Ethernet => "if-ethernet-switch",
            InterfaceKind::PortChannel => "if-eth-port-channel-switch",
        }
    }
}

impl Display for InterfaceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// A normalized switch interface: kind plus the numeric identifier part.
///
/// Operators enter interface labels free-form ("po101", "Port-channel101",
/// "e1/3"); everything downstream works on this normalized pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRef {
    pub kind: InterfaceKind,
    pub id: String,
}

impl InterfaceRef {
    /// Normalize a free-form interface label.
    ///
    /// The identifier keeps digits and `/` only; the remaining alphabetic
    /// prefix selects the kind by its first character (`p` for port-channel,
    /// `e` for ethernet).
    pub fn parse(label: &str) -> Result<Self, PsvmError> {
        let id: String = label.chars().filter(|c| c.is_ascii_digit() || *c == '/').collect();
        let prefix: String = label
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '/')
            .collect::<String>()
            .to_lowercase();

        let kind = if prefix.starts_with('p') {
            InterfaceKind::PortChannel
        } else if prefix.starts_with('e') {
            InterfaceKind::Ethernet
        } else {
            return Err(PsvmError::UnsupportedInterfaceKind(label.to_string()));
        };

        Ok(Self { kind, id })
    }

    /// Full interface name for show-running requests, e.g. "port-channel101".
    pub fn full_name(&self) -> String {
        format!("{}{}", self.kind.canonical_name(), self.id)
    }
}
