//! DDNS provider implementations.

mod duckdns;

#[cfg(test)]
mod tests;

pub use duckdns::DuckDnsProvider;

use serde::Serialize;

/// Result of a DNS update operation.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    /// Provider name.
    pub provider: String,
    /// Domains that were updated.
    pub domains: Vec<String>,
    /// Whether the update was successful.
    pub success: bool,
    /// IPv4 address sent (if any).
    pub ipv4: Option<String>,
    /// IPv6 address sent (if any).
    pub ipv6: Option<String>,
    /// Raw response body from the provider.
    pub response: String,
    /// Error message if failed.
    pub error: Option<String>,
    /// Timestamp of the update.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Resolve environment variable references (values starting with $).
pub fn resolve_env(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} not set", var_name);
            value.to_string()
        })
    } else {
        value.to_string()
    }
}
