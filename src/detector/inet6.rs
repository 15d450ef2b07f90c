//! Parser for the kernel's IPv6 interface address table (`/proc/net/if_inet6`).
//!
//! Each line looks like
//! `20010db8000000000000000000000001 02 40 00 80 eth0`: a 32-digit hex
//! address followed by ifindex, prefix length, scope, flags and the
//! interface name.

use super::filter::AddressFilter;
use crate::error::{DdnsError, Result};
use std::net::{IpAddr, Ipv6Addr};

/// Fields per if_inet6 line.
const FIELD_COUNT: usize = 6;

/// Hex digits in an unseparated IPv6 address.
const HEX_LEN: usize = 32;

const LOOPBACK_INTERFACE: &str = "lo";

const WIRELESS_PREFIXES: &[&str] = &["wlan", "wlp"];

/// One address line of the if_inet6 table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    /// The address exactly as the kernel wrote it.
    pub raw_hex: String,
    pub address: Ipv6Addr,
    pub interface: String,
}

impl InterfaceRecord {
    /// Parse a single non-empty table line.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < FIELD_COUNT {
            return Err(DdnsError::Parse(format!(
                "if_inet6 line has {} fields, expected {}: {:?}",
                fields.len(),
                FIELD_COUNT,
                line
            )));
        }

        let raw_hex = fields[0];
        if raw_hex.len() != HEX_LEN || !raw_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DdnsError::Parse(format!(
                "if_inet6 address is not {} hex digits: {:?}",
                HEX_LEN, raw_hex
            )));
        }

        let bits = u128::from_str_radix(raw_hex, 16)
            .map_err(|e| DdnsError::Parse(format!("bad if_inet6 address {:?}: {}", raw_hex, e)))?;

        Ok(Self {
            raw_hex: raw_hex.to_string(),
            address: Ipv6Addr::from(bits),
            interface: fields[fields.len() - 1].to_string(),
        })
    }

    /// The address as eight colon-separated groups of four digits,
    /// keeping the kernel's digits verbatim (no `::` compression).
    pub fn grouped(&self) -> String {
        group_hex(&self.raw_hex)
    }

    fn is_loopback(&self) -> bool {
        self.interface == LOOPBACK_INTERFACE
    }

    fn is_wireless(&self) -> bool {
        WIRELESS_PREFIXES
            .iter()
            .any(|prefix| self.interface.starts_with(prefix))
    }
}

/// Split a 32-digit hex string into `xxxx:xxxx:...` groups.
pub fn group_hex(raw_hex: &str) -> String {
    raw_hex
        .as_bytes()
        .chunks(4)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(":")
}

/// Extract publishable IPv6 addresses from if_inet6 text, in table order.
///
/// Loopback-interface addresses are always dropped. Link-local addresses
/// are dropped when `filter` removes LAN addresses, and wireless interfaces
/// when `skip_wireless` is set. Any malformed line fails the whole parse.
pub fn parse_if_inet6(
    content: &str,
    filter: &AddressFilter,
    skip_wireless: bool,
) -> Result<Vec<String>> {
    let mut addresses = Vec::new();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let record = InterfaceRecord::parse(line)?;

        if record.is_loopback()
            || (skip_wireless && record.is_wireless())
            || !filter.permits(&IpAddr::V6(record.address))
        {
            continue;
        }

        addresses.push(record.grouped());
    }

    Ok(addresses)
}
