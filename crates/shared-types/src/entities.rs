//! # Core Domain Entities
//!
//! - [`Protocol`]: transport protocol, normalised to `TCP` or `UDP`
//! - [`PortMapping`]: a validated forwarding rule
//! - [`PortMappingEntry`]: the loosely typed form read from configuration,
//!   turned into a `PortMapping` by [`PortMappingEntry::validate`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{MappingError, PortField};

/// Lowest port a mapping may use.
pub const MIN_PORT: i64 = 1;

/// Highest port a mapping may use.
pub const MAX_PORT: i64 = 65535;

/// Transport protocol of a mapping.
///
/// Input is case-insensitive; the canonical spelling is upper case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Protocol {
    /// Transmission Control Protocol.
    #[default]
    Tcp,
    /// User Datagram Protocol.
    Udp,
}

impl Protocol {
    /// Canonical upper-case name, as sent to the gateway.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tcp") {
            Ok(Protocol::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Protocol::Udp)
        } else {
            Err(MappingError::Protocol(s.to_string()))
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = MappingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Protocol> for String {
    fn from(value: Protocol) -> Self {
        value.as_str().to_string()
    }
}

/// A desired forwarding rule: external port on the gateway to internal port
/// on this host.
///
/// Construct through [`PortMapping::new`], the parser or
/// [`PortMappingEntry::validate`]; all of them reject port `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PortMapping {
    /// Port opened on the gateway.
    pub external_port: u16,
    /// Port traffic is delivered to.
    pub internal_port: u16,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Free-text label for descriptions and logs. Empty means unnamed.
    pub name: String,
}

impl PortMapping {
    /// Create an unnamed mapping, rejecting port `0` on either side.
    pub fn new(
        external_port: u16,
        internal_port: u16,
        protocol: Protocol,
    ) -> Result<Self, MappingError> {
        let mapping = Self {
            external_port,
            internal_port,
            protocol,
            name: String::new(),
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Return the same mapping carrying `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check both ports lie in `1..=65535`.
    ///
    /// The protocol is valid by construction.
    pub fn validate(&self) -> Result<(), MappingError> {
        check_port(PortField::External, i64::from(self.external_port))?;
        check_port(PortField::Internal, i64::from(self.internal_port))?;
        Ok(())
    }

    /// Whether the mapping carries a non-empty name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{}/{}",
            self.external_port, self.internal_port, self.protocol
        )?;
        if self.is_named() {
            write!(f, " ({})", self.name)?;
        }
        Ok(())
    }
}

/// A port mapping as written in a configuration file.
///
/// Fields are kept loose so that out-of-range ports and unknown protocols
/// surface as [`MappingError`]s from [`validate`](Self::validate) rather than
/// as deserialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortMappingEntry {
    /// Port opened on the gateway. Missing means `0`, rejected on validation.
    #[serde(default)]
    pub external_port: i64,
    /// Port traffic is delivered to.
    #[serde(default)]
    pub internal_port: i64,
    /// Protocol name, any case.
    #[serde(default)]
    pub protocol: String,
    /// Optional label.
    #[serde(default)]
    pub name: String,
}

impl PortMappingEntry {
    /// Validate the entry and produce the canonical mapping.
    ///
    /// Checks run in order: external port, internal port, protocol.
    pub fn validate(&self) -> Result<PortMapping, MappingError> {
        let external_port = check_port(PortField::External, self.external_port)?;
        let internal_port = check_port(PortField::Internal, self.internal_port)?;
        let protocol = self.protocol.parse::<Protocol>()?;
        Ok(PortMapping {
            external_port,
            internal_port,
            protocol,
            name: self.name.clone(),
        })
    }
}

impl From<&PortMapping> for PortMappingEntry {
    fn from(mapping: &PortMapping) -> Self {
        Self {
            external_port: i64::from(mapping.external_port),
            internal_port: i64::from(mapping.internal_port),
            protocol: mapping.protocol.to_string(),
            name: mapping.name.clone(),
        }
    }
}

pub(crate) fn check_port(field: PortField, value: i64) -> Result<u16, MappingError> {
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(MappingError::Range { field, value });
    }
    u16::try_from(value).map_err(|_| MappingError::Range { field, value })
}
