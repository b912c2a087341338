//! Printer address resolution.
//!
//! Handles the various formats users enter as printer addresses:
//! `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. A missing port falls back
//! to the configured one.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Default ZPL raw printing port (JetDirect / RAW).
pub const DEFAULT_PORT: u16 = 9100;

/// Resolve a user-provided printer address string to a `SocketAddr`.
///
/// Accepts these formats:
/// - `192.168.1.55:9100` -- IP with explicit port
/// - `192.168.1.55` -- IP without port (uses `default_port`)
/// - `printer01.local:9100` -- hostname with port
/// - `printer01.local` -- hostname without port (uses `default_port`)
///
/// Returns the first resolved address. Blank input is
/// [`PrintError::MissingAddress`].
pub fn resolve_printer_addr(input: &str, default_port: u16) -> Result<SocketAddr, PrintError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PrintError::MissingAddress);
    }

    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    // Hostname with port. Only attempted when the input looks like one, so a
    // bare hostname is not misread.
    if input.contains(':')
        && let Ok(mut addrs) = input.to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    if let Ok(mut addrs) = (input, default_port).to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    Err(PrintError::NoAddressFound(input.to_string()))
}
