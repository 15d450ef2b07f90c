//! Fixed-suffix IPv6 synthesis.
//!
//! Useful when the host's own address rotates (privacy extensions) but a
//! service on the same prefix listens on a stable interface identifier.

use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;

/// A fixed low-order suffix to graft onto a discovered prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixSpec {
    pub suffix: Ipv6Addr,
    pub prefix_len: u8,
}

impl SuffixSpec {
    /// Compose against a discovered address given in text form.
    pub fn apply(&self, discovered: &str) -> Result<Ipv6Addr> {
        let discovered: Ipv6Addr = discovered.parse().map_err(|_| {
            DdnsError::IpDetection(format!("Invalid IPv6 address: {}", discovered))
        })?;
        compose(discovered, self.suffix, self.prefix_len)
    }
}

/// Keep the top `prefix_len` bits of `discovered` and the rest from `suffix`.
pub fn compose(discovered: Ipv6Addr, suffix: Ipv6Addr, prefix_len: u8) -> Result<Ipv6Addr> {
    if prefix_len > 128 {
        return Err(DdnsError::Config(format!(
            "IPv6 prefix length {} is larger than 128",
            prefix_len
        )));
    }

    let high_mask = u128::MAX
        .checked_shl(128 - u32::from(prefix_len))
        .unwrap_or(0);

    let bits = (u128::from(discovered) & high_mask) | (u128::from(suffix) & !high_mask);
    Ok(Ipv6Addr::from(bits))
}
