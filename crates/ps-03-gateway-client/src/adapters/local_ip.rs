//! Local IPv4 address detection.

use std::net::{IpAddr, Ipv4Addr};

use crate::domain::GatewayError;

/// First IPv4 address of any local interface that is not loopback.
pub fn detect_local_ipv4() -> Result<Ipv4Addr, GatewayError> {
    let interfaces = if_addrs::get_if_addrs()
        .map_err(|e| GatewayError::LocalIp(format!("failed to get interface addresses: {}", e)))?;

    first_non_loopback_ipv4(interfaces.iter().map(|iface| iface.ip()))
        .ok_or_else(|| GatewayError::LocalIp("no valid local IP found".to_string()))
}

/// First IPv4 address in `addrs` that is not loopback.
pub fn first_non_loopback_ipv4<I>(addrs: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}
