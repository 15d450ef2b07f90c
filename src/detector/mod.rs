//! Public IP detection.
//!
//! Each address family is resolved by one configured strategy: an HTTP echo
//! service, or a parse of the kernel's own tables.

mod echo;
mod fib_trie;
mod filter;
mod inet6;
mod source;
mod suffix;


pub use echo::{EchoClient, Ipv4Echo, Ipv6Echo, DEFAULT_TIMEOUT};
pub use fib_trie::parse_fib_trie;
pub use filter::{is_globally_routable, is_ipv4_global, is_ipv6_link_local, AddressFilter};
pub use inet6::{group_hex, parse_if_inet6, InterfaceRecord};
pub use source::{ProcFs, TableSource, FIB_TRIE_PATH, IF_INET6_PATH};
pub use suffix::{compose, SuffixSpec};

#[cfg(test)]
pub use source::MockTableSource;

use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

/// How to learn the host's IPv4 address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ipv4Strategy {
    RemoteEcho(Ipv4Echo),
    /// Host routes from `/proc/net/fib_trie`.
    RoutingTable,
    /// Don't detect IPv4 at all.
    #[default]
    Disabled,
}

/// How to learn the host's IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ipv6Strategy {
    /// Interface addresses from `/proc/net/if_inet6`.
    InterfaceTable,
    RemoteEcho(Ipv6Echo),
}

impl Ipv4Strategy {
    /// Name used in the config file and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ipv4Strategy::RemoteEcho(Ipv4Echo::Ipify) => "ipify",
            Ipv4Strategy::RemoteEcho(Ipv4Echo::IpipNet) => "ipip-net",
            Ipv4Strategy::RoutingTable => "routing-table",
            Ipv4Strategy::Disabled => "disabled",
        }
    }
}

impl Ipv6Strategy {
    /// Name used in the config file and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ipv6Strategy::InterfaceTable => "interface-table",
            Ipv6Strategy::RemoteEcho(Ipv6Echo::IpipNet) => "ipip-net",
        }
    }

    /// Read the kernel table where there is one, otherwise ask ipip.net.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            Ipv6Strategy::InterfaceTable
        } else {
            Ipv6Strategy::RemoteEcho(Ipv6Echo::IpipNet)
        }
    }
}

impl Default for Ipv6Strategy {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl FromStr for Ipv4Strategy {
    type Err = DdnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ipify" => Ok(Ipv4Strategy::RemoteEcho(Ipv4Echo::Ipify)),
            "ipip-net" => Ok(Ipv4Strategy::RemoteEcho(Ipv4Echo::IpipNet)),
            "routing-table" => Ok(Ipv4Strategy::RoutingTable),
            "disabled" => Ok(Ipv4Strategy::Disabled),
            other => Err(DdnsError::Config(format!(
                "Unknown IPv4 strategy '{}' (expected ipify, ipip-net, routing-table or disabled)",
                other
            ))),
        }
    }
}

impl FromStr for Ipv6Strategy {
    type Err = DdnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "interface-table" => Ok(Ipv6Strategy::InterfaceTable),
            "ipip-net" => Ok(Ipv6Strategy::RemoteEcho(Ipv6Echo::IpipNet)),
            other => Err(DdnsError::Config(format!(
                "Unknown IPv6 strategy '{}' (expected interface-table or ipip-net)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Ipv4Strategy {
    type Error = DdnsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<String> for Ipv6Strategy {
    type Error = DdnsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Ipv4Strategy> for String {
    fn from(s: Ipv4Strategy) -> Self {
        s.as_str().to_string()
    }
}

impl From<Ipv6Strategy> for String {
    fn from(s: Ipv6Strategy) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Ipv4Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Ipv6Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses found for each family. Element 0 is the one to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddresses {
    /// `None` when IPv4 detection is disabled.
    pub ipv4: Option<Vec<String>>,
    pub ipv6: Vec<String>,
}

impl ResolvedAddresses {
    /// The address to publish for `family`, if any was found.
    pub fn primary(&self, family: AddressFamily) -> Option<&str> {
        let list = match family {
            AddressFamily::V4 => self.ipv4.as_deref()?,
            AddressFamily::V6 => self.ipv6.as_slice(),
        };
        list.first().map(String::as_str)
    }
}

/// Runs the configured strategy for each address family.
pub struct AddressResolver<S = ProcFs> {
    source: S,
    echo: EchoClient,
    filter: AddressFilter,
    skip_wireless: bool,
}

impl AddressResolver<ProcFs> {
    /// Resolver over procfs and the public echo services.
    pub fn new(filter: AddressFilter, skip_wireless: bool, timeout: Duration) -> Result<Self> {
        Ok(Self::with_parts(
            ProcFs::new(),
            EchoClient::new(timeout)?,
            filter,
            skip_wireless,
        ))
    }
}

impl<S: TableSource> AddressResolver<S> {
    /// Resolver over an arbitrary table source and echo client.
    pub fn with_parts(
        source: S,
        echo: EchoClient,
        filter: AddressFilter,
        skip_wireless: bool,
    ) -> Self {
        Self {
            source,
            echo,
            filter,
            skip_wireless,
        }
    }

    /// Resolve both families concurrently; the first failure wins.
    pub async fn resolve(&self, v4: Ipv4Strategy, v6: Ipv6Strategy) -> Result<ResolvedAddresses> {
        let (ipv4, ipv6) = tokio::try_join!(self.resolve_ipv4(v4), self.resolve_ipv6(v6))?;
        Ok(ResolvedAddresses { ipv4, ipv6 })
    }

    /// Run one IPv4 strategy. `None` means detection is disabled.
    pub async fn resolve_ipv4(&self, strategy: Ipv4Strategy) -> Result<Option<Vec<String>>> {
        let addresses: Vec<String> = match strategy {
            Ipv4Strategy::Disabled => return Ok(None),
            Ipv4Strategy::RemoteEcho(echo) => {
                self.echo.fetch_ipv4(echo).await?.into_iter().collect()
            }
            Ipv4Strategy::RoutingTable => {
                let dump = self.source.read_fib_trie().await?;
                parse_fib_trie(&dump, &self.filter)?
            }
        };

        Ok(Some(addresses))
    }

    /// Run one IPv6 strategy.
    pub async fn resolve_ipv6(&self, strategy: Ipv6Strategy) -> Result<Vec<String>> {
        match strategy {
            Ipv6Strategy::InterfaceTable => {
                let table = self.source.read_if_inet6().await?;
                parse_if_inet6(&table, &self.filter, self.skip_wireless)
            }
            Ipv6Strategy::RemoteEcho(echo) => Ok(vec![self.echo.fetch_ipv6(echo).await?]),
        }
    }
}
