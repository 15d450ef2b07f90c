//! Configuration management for duckdns-updater.

use crate::detector::{AddressFilter, Ipv4Strategy, Ipv6Strategy, SuffixSpec, DEFAULT_TIMEOUT};
use crate::error::{DdnsError, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `remove_lan` ("1" keeps filtering on).
pub const REMOVE_LAN_ENV: &str = "REMOVE_LAN_IP";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// DuckDNS subdomain(s), comma-separated.
    #[serde(default)]
    pub domains: String,

    /// DuckDNS token (or environment variable name if prefixed with $).
    #[serde(default)]
    pub token: String,

    /// IPv4 detection strategy.
    #[serde(default)]
    pub ipv4: Ipv4Strategy,

    /// IPv6 detection strategy.
    #[serde(default)]
    pub ipv6: Ipv6Strategy,

    /// Drop link-local, loopback and LAN addresses (default: true).
    #[serde(default = "default_true")]
    pub remove_lan: bool,

    /// Ignore addresses on wireless interfaces (default: true).
    #[serde(default = "default_true")]
    pub skip_wireless: bool,

    /// HTTP timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Publish `prefix(discovered) | suffix` instead of the discovered IPv6.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_suffix: Option<SuffixSpec>,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains: String::new(),
            token: String::new(),
            ipv4: Ipv4Strategy::default(),
            ipv6: Ipv6Strategy::default(),
            remove_lan: true,
            skip_wireless: true,
            timeout_secs: default_timeout(),
            ipv6_suffix: None,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("duckdns-updater").join("config.toml"))
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the defaults; `REMOVE_LAN_IP` is applied on top.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if let Ok(value) = std::env::var(REMOVE_LAN_ENV) {
            config.remove_lan = value == "1";
        }

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate example configuration.
    pub fn example() -> Self {
        Self {
            domains: "mysubdomain".to_string(),
            token: "$DUCKDNS_TOKEN".to_string(),
            ipv6_suffix: Some(SuffixSpec {
                suffix: Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0xabcd, 0x1234),
                prefix_len: 64,
            }),
            ..Self::default()
        }
    }

    /// The detection filter this configuration asks for.
    pub fn filter(&self) -> AddressFilter {
        AddressFilter::new(self.remove_lan)
    }

    /// HTTP timeout for echo lookups and DuckDNS requests.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Subdomains as a list.
    pub fn domain_list(&self) -> Vec<&str> {
        self.domains
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect()
    }

    /// Check the fields the updater cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.domain_list().is_empty() {
            return Err(DdnsError::Config("No DuckDNS domains configured".to_string()));
        }
        if self.token.is_empty() {
            return Err(DdnsError::Config("No DuckDNS token configured".to_string()));
        }
        if let Some(spec) = &self.ipv6_suffix {
            if spec.prefix_len > 128 {
                return Err(DdnsError::Config(format!(
                    "ipv6_suffix.prefix_len must be at most 128, got {}",
                    spec.prefix_len
                )));
            }
        }
        Ok(())
    }
}
