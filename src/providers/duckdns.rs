//! DuckDNS provider.

use super::UpdateResult;
use crate::error::{DdnsError, Result};
use std::time::Duration;

const DUCKDNS_URL: &str = "https://www.duckdns.org";

/// DuckDNS provider.
pub struct DuckDnsProvider {
    client: reqwest::Client,
    domains: Vec<String>,
    token: String,
    base_url: String,
}

impl DuckDnsProvider {
    /// Create a new DuckDNS provider.
    pub fn new(domains: Vec<String>, token: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(domains, token, timeout, DUCKDNS_URL.to_string())
    }

    /// Create a provider talking to a custom endpoint (for testing).
    pub fn with_base_url(
        domains: Vec<String>,
        token: String,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            domains,
            token,
            base_url,
        })
    }

    /// Provider name reported in [`UpdateResult::provider`].
    pub fn name(&self) -> &'static str {
        "duckdns"
    }

    /// Fully qualified names of the managed domains.
    pub fn hostnames(&self) -> Vec<String> {
        self.domains
            .iter()
            .map(|d| format!("{}.duckdns.org", d))
            .collect()
    }

    /// Clear the existing records, then publish the given addresses.
    ///
    /// A family left as `None` is not sent, so DuckDNS keeps (or, for IPv4,
    /// auto-detects) it.
    pub async fn update(&self, ipv4: Option<&str>, ipv6: Option<&str>) -> Result<UpdateResult> {
        let mut query = vec![
            ("domains", self.domains.join(",")),
            ("token", self.token.clone()),
            ("verbose", "true".to_string()),
        ];
        if let Some(ip) = ipv4 {
            query.push(("ip", ip.to_string()));
        }
        if let Some(ip) = ipv6 {
            query.push(("ipv6", ip.to_string()));
        }

        let mut clear = query.clone();
        clear.push(("clear", "true".to_string()));
        self.send(&clear).await?;

        tracing::info!(
            "Updating {} (ipv4={:?}, ipv6={:?})",
            self.domains.join(","),
            ipv4,
            ipv6
        );
        let text = self.send(&query).await?;

        // Verbose replies look like "OK\n1.2.3.4\n\nUPDATED".
        let success = text.lines().next().map(str::trim) == Some("OK");

        Ok(UpdateResult {
            provider: self.name().to_string(),
            domains: self.hostnames(),
            success,
            ipv4: ipv4.map(str::to_string),
            ipv6: ipv6.map(str::to_string),
            error: (!success).then(|| format!("DuckDNS returned: {}", text.trim())),
            response: text,
            timestamp: chrono::Utc::now(),
        })
    }

    async fn send(&self, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/update", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        Ok(response.text().await?)
    }
}
