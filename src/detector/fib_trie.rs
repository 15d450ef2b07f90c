//! Parser for the kernel's IPv4 routing trie dump (`/proc/net/fib_trie`).
//!
//! Host routes show up as a leaf line followed by its route annotation:
//!
//! ```text
//!            |-- 192.0.2.15
//!               /32 host LOCAL
//! ```

use super::filter::AddressFilter;
use crate::error::{DdnsError, Result};
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};

const HOST_ROUTE_MARKER: &str = "32 host";

const LEAF_PREFIX: &str = "|--";
const NODE_PREFIX: &str = "+--";

/// Collect the addresses of all `/32 host` routes, sorted and deduplicated.
///
/// A marker line is attributed to the nearest `|--` leaf above it, so a leaf
/// may carry several route annotations. Node lines (`+--`) and table headers
/// end the current leaf.
pub fn parse_fib_trie(content: &str, filter: &AddressFilter) -> Result<Vec<String>> {
    let mut hosts = BTreeSet::new();
    let mut leaf: Option<&str> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        let mut fields = trimmed.split_whitespace();

        if trimmed.starts_with(LEAF_PREFIX) {
            leaf = fields.nth(1);
        } else if trimmed.starts_with(NODE_PREFIX) || fields.nth(1).is_none() {
            leaf = None;
        } else if line.contains(HOST_ROUTE_MARKER) {
            if let Some(addr) = leaf {
                hosts.insert(addr);
            }
        }
    }

    let mut addresses = Vec::with_capacity(hosts.len());
    for host in hosts {
        let ip: Ipv4Addr = host
            .parse()
            .map_err(|_| DdnsError::Parse(format!("fib_trie host route {:?} is not IPv4", host)))?;

        if filter.permits(&IpAddr::V4(ip)) {
            addresses.push(host.to_string());
        }
    }

    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIE: &str = "\
Main:
  +-- 0.0.0.0/0 3 0 5
     |-- 0.0.0.0
        /0 universe UNICAST
     +-- 127.0.0.0/8 2 0 2
        +-- 127.0.0.0/31 1 0 0
           |-- 127.0.0.0
              /8 host LOCAL
           |-- 127.0.0.1
              /32 host LOCAL
        |-- 127.255.255.255
           /32 link BROADCAST
     +-- 192.168.1.0/24 2 0 2
        |-- 192.168.1.20
           /32 host LOCAL
     |-- 203.0.114.9
        /32 host LOCAL
Local:
  +-- 0.0.0.0/0 3 0 5
     |-- 203.0.114.9
        /32 host LOCAL
     |-- 198.51.100.77
        /32 host LOCAL
";

    #[test]
    fn test_host_routes_unfiltered() {
        let out = parse_fib_trie(TRIE, &AddressFilter::new(false)).unwrap();
        assert_eq!(
            out,
            vec!["127.0.0.1", "192.168.1.20", "198.51.100.77", "203.0.114.9"]
        );
    }

    #[test]
    fn test_host_routes_filtered() {
        // 198.51.100.0/24 is documentation space.
        let out = parse_fib_trie(TRIE, &AddressFilter::new(true)).unwrap();
        assert_eq!(out, vec!["203.0.114.9"]);
    }

    #[test]
    fn test_two_addresses_sorted() {
        let trie = "|-- 9.9.9.9\n/32 host LOCAL\n|-- 1.1.1.1\n/32 host LOCAL\n|-- 9.9.9.9\n/32 host LOCAL\n";
        let out = parse_fib_trie(trie, &AddressFilter::new(false)).unwrap();
        assert_eq!(out, vec!["1.1.1.1", "9.9.9.9"]);
    }

    #[test]
    fn test_output_strictly_ascending() {
        let out = parse_fib_trie(TRIE, &AddressFilter::new(false)).unwrap();
        assert!(out.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_marker_without_preceding_record() {
        let trie = "/32 host LOCAL\nLocal:\n/32 host LOCAL\n";
        assert!(parse_fib_trie(trie, &AddressFilter::new(false))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_leaf_with_several_annotations() {
        let trie = "\
Main:
  +-- 0.0.0.0/0 3 0 5
     |-- 203.0.114.9
        /32 universe UNICAST
        /32 host LOCAL
     |-- 192.0.2.255
        /32 link BROADCAST
";
        let out = parse_fib_trie(trie, &AddressFilter::new(false)).unwrap();
        assert_eq!(out, vec!["203.0.114.9"]);
    }

    #[test]
    fn test_node_line_ends_leaf() {
        let trie = "|-- 203.0.114.9\n+-- 10.0.0.0/8 2 0 2\n/32 host LOCAL\n";
        assert!(parse_fib_trie(trie, &AddressFilter::new(false))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_ipv4_host_is_parse_error() {
        let trie = "|-- not-an-ip\n/32 host LOCAL\n";
        let result = parse_fib_trie(trie, &AddressFilter::new(false));
        assert!(matches!(result, Err(DdnsError::Parse(_))));
    }
}
