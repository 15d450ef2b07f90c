//! Access to the kernel pseudo-files the table strategies read.

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub const IF_INET6_PATH: &str = "/proc/net/if_inet6";
pub const FIB_TRIE_PATH: &str = "/proc/net/fib_trie";

/// Reader for the interface address table and the routing trie dump.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Raw text of the IPv6 interface address table.
    async fn read_if_inet6(&self) -> Result<String>;

    /// Raw text of the IPv4 routing trie.
    async fn read_fib_trie(&self) -> Result<String>;
}

/// Reads the tables from procfs (or from any other pair of files).
#[derive(Debug, Clone)]
pub struct ProcFs {
    if_inet6: PathBuf,
    fib_trie: PathBuf,
}

impl ProcFs {
    /// Read from the standard `/proc/net` locations.
    pub fn new() -> Self {
        Self::with_paths(IF_INET6_PATH, FIB_TRIE_PATH)
    }

    /// Read from custom locations.
    pub fn with_paths(if_inet6: impl Into<PathBuf>, fib_trie: impl Into<PathBuf>) -> Self {
        Self {
            if_inet6: if_inet6.into(),
            fib_trie: fib_trie.into(),
        }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableSource for ProcFs {
    async fn read_if_inet6(&self) -> Result<String> {
        tracing::debug!("Reading {}", self.if_inet6.display());
        Ok(tokio::fs::read_to_string(&self.if_inet6).await?)
    }

    async fn read_fib_trie(&self) -> Result<String> {
        tracing::debug!("Reading {}", self.fib_trie.display());
        Ok(tokio::fs::read_to_string(&self.fib_trie).await?)
    }
}
