//! Parsing of `ss` connection listings and validation of kill targets.

use std::net::IpAddr;

use wakehost_common::{ESTABLISHED, SshConnection};

use crate::domain::error::RequestError;

/// Split an `address:port` pair on its rightmost colon.
///
/// Handles IPv4 (`10.0.0.5:51000`) and bracketed IPv6
/// (`[::ffff:10.0.0.5]:51000`) forms alike. A missing colon yields the
/// input unchanged with port 0; an unparsable port (`*`, out of range)
/// yields port 0 rather than failing.
#[must_use]
pub fn parse_address(addr: &str) -> (String, u16) {
    match addr.rsplit_once(':') {
        Some((address, port)) => (address.to_string(), port.parse().unwrap_or(0)),
        None => (addr.to_string(), 0),
    }
}

/// Parse `ss -t -n state established` output into connection records.
///
/// Each line is `Recv-Q Send-Q Local:Port Peer:Port [Process]`. Lines with
/// fewer than four whitespace-separated fields are skipped.
#[must_use]
pub fn parse_connections(output: &str) -> Vec<SshConnection> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            let (local_address, local_port) = parse_address(fields[2]);
            let (remote_address, remote_port) = parse_address(fields[3]);
            Some(SshConnection {
                state: ESTABLISHED.to_string(),
                local_address,
                local_port,
                remote_address,
                remote_port,
            })
        })
        .collect()
}

/// A validated single-connection kill target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillTarget {
    /// Address exactly as the caller sent it (trimmed), brackets preserved.
    pub address: String,
    pub port: u16,
}

/// Validate the `remoteAddress`/`remotePort` pair of a kill request.
///
/// Both must be present and non-empty/non-zero. The address must be an IP
/// literal (optionally bracketed, optionally with a `%zone` suffix inside or
/// after the brackets) so that nothing but an address ever reaches the `ss`
/// filter.
pub fn validate_kill_target(
    address: Option<&str>,
    port: Option<u16>,
) -> Result<KillTarget, RequestError> {
    let address = address.map(str::trim).unwrap_or_default();
    let port = port.unwrap_or(0);
    if address.is_empty() || port == 0 {
        return Err(RequestError::MissingParameter);
    }

    if ip_literal(address).is_none() {
        return Err(RequestError::InvalidAddress(address.to_string()));
    }

    Ok(KillTarget {
        address: address.to_string(),
        port,
    })
}

/// Extract the IP from `addr`, `addr%zone`, `[addr]`, `[addr%zone]` or
/// `[addr]%zone`, the last being how `ss -n` prints link-local peers.
fn ip_literal(address: &str) -> Option<IpAddr> {
    let (host, trailer) = match address.strip_prefix('[') {
        Some(inner) => inner.split_once(']')?,
        None => (address, ""),
    };
    let (ip, zone) = match trailer.strip_prefix('%') {
        Some(zone) => (host, Some(zone)),
        None if trailer.is_empty() => match host.split_once('%') {
            Some((ip, zone)) => (ip, Some(zone)),
            None => (host, None),
        },
        None => return None,
    };
    if let Some(zone) = zone {
        let valid = !zone.is_empty()
            && zone
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return None;
        }
    }
    ip.parse().ok()
}
