//! # Port Mapping Parser
//!
//! Parses human-entered specs of the form `[<ext>][:<int>][/<proto>]`.
//!
//! - A bare port is used for both sides.
//! - In a colon pair, an empty side inherits the other side.
//! - The protocol defaults to TCP.
//!
//! Structural problems are [`MappingError::Format`]; once the structure is
//! accepted the range check applies and its errors pass through unchanged.
//! The parser never assigns a name.

use std::str::FromStr;

use crate::entities::{check_port, PortMapping, Protocol};
use crate::errors::{MappingError, PortField};

/// Parse a mapping spec such as `8080:80/tcp`, `80` or `:53/udp`.
pub fn parse_port_mapping(spec: &str) -> Result<PortMapping, MappingError> {
    let (port_part, protocol) = split_protocol(spec)?;
    let (external, internal) = split_ports(port_part)?;

    let external_port = check_port(PortField::External, external)?;
    let internal_port = check_port(PortField::Internal, internal)?;

    Ok(PortMapping {
        external_port,
        internal_port,
        protocol,
        name: String::new(),
    })
}

fn split_protocol(spec: &str) -> Result<(&str, Protocol), MappingError> {
    let mut parts = spec.split('/');
    let port_part = parts.next().unwrap_or_default();
    let protocol = match (parts.next(), parts.next()) {
        (None, _) => Protocol::Tcp,
        (Some(raw), None) => raw.parse::<Protocol>().map_err(|_| {
            MappingError::format(format!("protocol must be TCP or UDP, got {raw:?}"))
        })?,
        (Some(_), Some(_)) => {
            return Err(MappingError::format(
                "expected <external>:<internal>[/<protocol>] or <port>",
            ))
        }
    };
    Ok((port_part, protocol))
}

fn split_ports(port_part: &str) -> Result<(i64, i64), MappingError> {
    let ports: Vec<&str> = port_part.split(':').collect();
    match ports.as_slice() {
        [single] => {
            if single.is_empty() {
                return Err(MappingError::format("port cannot be empty"));
            }
            let port = parse_number(single)?;
            Ok((port, port))
        }
        [external, internal] => match (external.is_empty(), internal.is_empty()) {
            (true, true) => Err(MappingError::format(
                "both external and internal ports cannot be empty",
            )),
            (true, false) => {
                let port = parse_number(internal)?;
                Ok((port, port))
            }
            (false, true) => {
                let port = parse_number(external)?;
                Ok((port, port))
            }
            (false, false) => Ok((parse_number(external)?, parse_number(internal)?)),
        },
        _ => Err(MappingError::format(
            "expected <external>:<internal> or <port>",
        )),
    }
}

fn parse_number(token: &str) -> Result<i64, MappingError> {
    token
        .parse::<i64>()
        .map_err(|_| MappingError::format(format!("port {token:?} is not a number")))
}

impl FromStr for PortMapping {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_port_mapping(s)
    }
}
