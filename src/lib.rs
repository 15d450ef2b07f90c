//! # duckdns-updater
//!
//! Works out this machine's public IPv4/IPv6 addresses and pushes them to
//! DuckDNS.
//!
//! ## Detection strategies
//!
//! - IPv4: ipify (JSON), ipip.net (text), host routes from `/proc/net/fib_trie`
//! - IPv6: interface addresses from `/proc/net/if_inet6`, ipip.net (text)
//! - Optional fixed-suffix IPv6 synthesis on top of the detected prefix
//!
//! Link-local, loopback and LAN addresses are filtered out unless disabled
//! with `remove_lan = false` or `REMOVE_LAN_IP=0`.
//!
//! ## Usage
//!
//! ```bash
//! # Print detected addresses
//! duckdns-updater resolve --ipv4 routing-table
//!
//! # Detect and update DuckDNS
//! duckdns-updater update
//!
//! # Write an example config
//! duckdns-updater init
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod providers;

pub use config::Config;
pub use detector::{AddressResolver, ResolvedAddresses};
pub use error::{DdnsError, Result};
