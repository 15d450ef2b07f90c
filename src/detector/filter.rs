//! Routability filtering for detected addresses.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Decides which detected addresses are worth publishing.
///
/// With `remove_lan` disabled the filter is a no-op and every syntactically
/// valid address passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFilter {
    remove_lan: bool,
}

impl AddressFilter {
    /// Create a filter; `remove_lan` drops link-local/LAN/loopback addresses.
    pub fn new(remove_lan: bool) -> Self {
        Self { remove_lan }
    }

    /// Whether non-routable addresses are being removed.
    pub fn removes_lan(&self) -> bool {
        self.remove_lan
    }

    /// Returns true if `ip` should be kept under this filter's policy.
    pub fn permits(&self, ip: &IpAddr) -> bool {
        !self.remove_lan || is_globally_routable(ip)
    }
}

impl Default for AddressFilter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Returns true for addresses reachable from the public internet.
///
/// IPv6 only excludes the link-local block; everything else is left to the
/// interface-level exclusions in the if_inet6 parser.
pub fn is_globally_routable(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_ipv4_global(v4),
        IpAddr::V6(v6) => !is_ipv6_link_local(v6),
    }
}

/// `Ipv4Addr::is_global` is still unstable, so the ranges are spelled out.
pub fn is_ipv4_global(ip: &Ipv4Addr) -> bool {
    let [a, b, c, d] = ip.octets();

    !(a == 0
        || ip.is_private()
        // shared address space 100.64.0.0/10
        || (a == 100 && (b & 0b1100_0000) == 0b0100_0000)
        || ip.is_loopback()
        || ip.is_link_local()
        // IETF protocol assignments, minus the two globally reachable ones
        || (a == 192 && b == 0 && c == 0 && d != 9 && d != 10)
        || ip.is_documentation()
        // benchmarking 198.18.0.0/15
        || (a == 198 && (b & 0xfe) == 18)
        // reserved 240.0.0.0/4
        || (a & 0xf0) == 0xf0
        || ip.is_multicast())
}

/// fe80::/10
pub fn is_ipv6_link_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_ipv4_non_global() {
        for addr in [
            "127.0.0.1",
            "169.254.0.1",
            "10.0.0.1",
            "192.168.1.1",
            "172.16.5.4",
            "100.64.0.1",
            "0.1.2.3",
            "192.0.2.1",
            "198.18.0.1",
            "224.0.0.1",
            "240.0.0.1",
            "255.255.255.255",
        ] {
            assert!(!is_globally_routable(&ip(addr)), "{addr} should be filtered");
        }
    }

    #[test]
    fn test_ipv4_global() {
        assert!(is_globally_routable(&ip("8.8.8.8")));
        assert!(is_globally_routable(&ip("203.0.114.7")));
        assert!(is_globally_routable(&ip("192.0.0.9")));
    }

    #[test]
    fn test_ipv6_link_local() {
        assert!(!is_globally_routable(&ip("fe80::1")));
        assert!(!is_globally_routable(&ip("febf:ffff::1")));
        assert!(is_globally_routable(&ip("fec0::1")));
        assert!(is_globally_routable(&ip("2001:4860:4860::8888")));
    }

    #[test]
    fn test_disabled_filter_permits_everything() {
        let filter = AddressFilter::new(false);
        assert!(filter.permits(&ip("127.0.0.1")));
        assert!(filter.permits(&ip("fe80::1")));

        let filter = AddressFilter::default();
        assert!(filter.removes_lan());
        assert!(!filter.permits(&ip("192.168.1.1")));
        assert!(filter.permits(&ip("8.8.8.8")));
    }
}
