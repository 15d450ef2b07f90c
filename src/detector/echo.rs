//! Public IP lookup through third-party echo services.

use crate::error::{DdnsError, Result};
use serde::Deserialize;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

pub const IPIFY_URL: &str = "https://api.ipify.org/?format=json";
pub const IPIP_URL: &str = "https://myip.ipip.net/";
pub const IPIP6_URL: &str = "https://myip6.ipip.net/";

/// Label ipip.net puts in front of the address ("current IP:").
const IPIP_LABEL: &str = "当前 IP：";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// IPv4 echo services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Echo {
    /// JSON API at api.ipify.org.
    Ipify,
    /// Plain-text page at myip.ipip.net.
    IpipNet,
}

/// IPv6 echo services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv6Echo {
    /// Plain-text page at myip6.ipip.net (served with a broken certificate).
    IpipNet,
}

#[derive(Debug, Deserialize)]
struct IpifyResponse {
    ip: Option<String>,
}

/// HTTP client for the echo services.
pub struct EchoClient {
    client: reqwest::Client,
    timeout: Duration,
    ipify_url: String,
    ipip_url: String,
    ipip6_url: String,
}

impl EchoClient {
    /// Create a client for the public endpoints.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoints(timeout, IPIFY_URL, IPIP_URL, IPIP6_URL)
    }

    /// Create a client with custom endpoints (for testing).
    pub fn with_endpoints(
        timeout: Duration,
        ipify_url: impl Into<String>,
        ipip_url: impl Into<String>,
        ipip6_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            timeout,
            ipify_url: ipify_url.into(),
            ipip_url: ipip_url.into(),
            ipip6_url: ipip6_url.into(),
        })
    }

    /// Ask an echo service for our IPv4 address.
    ///
    /// Returns `Ok(None)` when ipify answers without an `ip` field.
    pub async fn fetch_ipv4(&self, echo: Ipv4Echo) -> Result<Option<String>> {
        let ip = match echo {
            Ipv4Echo::Ipify => {
                let text = get(&self.client, &self.ipify_url).await?.text().await?;
                let body: IpifyResponse = serde_json::from_str(&text).map_err(|e| {
                    DdnsError::IpDetection(format!("Invalid JSON from ipify: {}", e))
                })?;
                match body.ip {
                    Some(ip) => ip,
                    None => return Ok(None),
                }
            }
            Ipv4Echo::IpipNet => {
                let text = get(&self.client, &self.ipip_url).await?.text().await?;
                scrape_ipip(&text)?
            }
        };

        ip.parse::<Ipv4Addr>()
            .map_err(|_| DdnsError::IpDetection(format!("Invalid IPv4 response: {}", ip)))?;

        tracing::debug!("Detected IPv4 {} via {:?}", ip, echo);
        Ok(Some(ip))
    }

    /// Ask an echo service for our IPv6 address.
    pub async fn fetch_ipv6(&self, echo: Ipv6Echo) -> Result<String> {
        let ip = match echo {
            Ipv6Echo::IpipNet => {
                // myip6.ipip.net serves an invalid certificate; relax
                // verification for this one request only.
                let insecure = reqwest::Client::builder()
                    .timeout(self.timeout)
                    .danger_accept_invalid_certs(true)
                    .build()?;
                let text = get(&insecure, &self.ipip6_url).await?.text().await?;
                scrape_ipip(&text)?
            }
        };

        ip.parse::<Ipv6Addr>()
            .map_err(|_| DdnsError::IpDetection(format!("Invalid IPv6 response: {}", ip)))?;

        tracing::debug!("Detected IPv6 {} via {:?}", ip, echo);
        Ok(ip)
    }
}

async fn get(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(DdnsError::Network(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    Ok(response)
}

/// Pull the address out of an ipip.net page like `当前 IP：1.2.3.4  来自于：...`.
fn scrape_ipip(text: &str) -> Result<String> {
    text.strip_prefix(IPIP_LABEL)
        .unwrap_or(text)
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| DdnsError::IpDetection("Empty response from ipip.net".to_string()))
}
