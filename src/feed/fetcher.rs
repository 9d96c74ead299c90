//! Feed fetcher with security measures.
//!
//! This module fetches and parses RSS/Atom feeds with SSRF protection
//! and resource limits.

use crate::config::FeedsConfig;
use crate::error::{DewdropError, Result};
use crate::feed::types::{ParsedFeed, ParsedItem, MAX_DESCRIPTION_LENGTH};
use feed_rs::parser;
use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;

/// User agent string for feed fetching.
const USER_AGENT: &str = "dewdrop/0.1 (feed digest curator)";

/// Feed fetcher with security measures.
pub struct FeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a new fetcher from the feed configuration.
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DewdropError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    /// Fetch and parse a feed from the given URL.
    ///
    /// This method performs SSRF validation and enforces size limits.
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DewdropError::Feed(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DewdropError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        // Check content length if available
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(DewdropError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DewdropError::Feed(format!("failed to read response: {}", e)))?;

        // Check actual size
        if bytes.len() as u64 > self.max_feed_size {
            return Err(DewdropError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        parse_feed(&bytes)
    }
}

/// Validate a URL for SSRF protection.
///
/// This function checks that:
/// - The URL uses http or https scheme
/// - The host is not a private/loopback address
/// - The host is not a reserved hostname
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| DewdropError::Feed(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(DewdropError::Feed(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| DewdropError::Feed("URL has no host".to_string()))?;

    match host {
        url::Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(DewdropError::Feed(format!("forbidden host: {}", domain)));
            }
        }
        url::Host::Ipv4(ipv4) => {
            let ip = IpAddr::V4(ipv4);
            if is_private_ip(&ip) {
                return Err(DewdropError::Feed(format!(
                    "private IP address not allowed: {}",
                    ip
                )));
            }
        }
        url::Host::Ipv6(ipv6) => {
            let ip = IpAddr::V6(ipv6);
            if is_private_ip(&ip) {
                return Err(DewdropError::Feed(format!(
                    "private IP address not allowed: {}",
                    ip
                )));
            }
        }
    }

    Ok(())
}

/// Check if a hostname is forbidden.
fn is_forbidden_hostname(host: &str) -> bool {
    let host_lower = host.to_lowercase();

    if host_lower == "localhost" {
        return true;
    }

    let forbidden_suffixes = [
        ".local",
        ".localhost",
        ".internal",
        ".intranet",
        ".corp",
        ".home",
        ".lan",
    ];

    forbidden_suffixes
        .iter()
        .any(|suffix| host_lower.ends_with(suffix))
}

/// Check if an IP address is private/reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            if ipv4.is_loopback() || ipv4.is_broadcast() || ipv4.is_unspecified() {
                return true;
            }

            let octets = ipv4.octets();

            // Private: 10.0.0.0/8
            if octets[0] == 10 {
                return true;
            }

            // Private: 172.16.0.0/12
            if octets[0] == 172 && (16..=31).contains(&octets[1]) {
                return true;
            }

            // Private: 192.168.0.0/16
            if octets[0] == 192 && octets[1] == 168 {
                return true;
            }

            // Link-local: 169.254.0.0/16
            if octets[0] == 169 && octets[1] == 254 {
                return true;
            }

            // Documentation: 192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24
            if (octets[0] == 192 && octets[1] == 0 && octets[2] == 2)
                || (octets[0] == 198 && octets[1] == 51 && octets[2] == 100)
                || (octets[0] == 203 && octets[1] == 0 && octets[2] == 113)
            {
                return true;
            }

            false
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }

            let segments = ipv6.segments();

            // Unique local: fc00::/7
            if (segments[0] & 0xfe00) == 0xfc00 {
                return true;
            }

            // Link-local: fe80::/10
            if (segments[0] & 0xffc0) == 0xfe80 {
                return true;
            }

            false
        }
    }
}

/// Parse feed bytes into a ParsedFeed.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| DewdropError::Feed(format!("failed to parse feed: {}", e)))?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());

    let description = feed.description.map(|d| strip_html(&d.content));

    let site_url = feed.links.first().map(|l| l.href.clone());

    let items: Vec<ParsedItem> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let guid = entry.id;
            let item_title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let link = entry.links.first().map(|l| l.href.clone());
            let item_description = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|d| truncate_description(&strip_html(&d)));
            let author = entry.authors.first().map(|a| a.name.clone());
            let published_at = entry.published.or(entry.updated);

            ParsedItem {
                guid,
                title: item_title,
                link,
                description: item_description,
                author,
                published_at,
            }
        })
        .collect();

    Ok(ParsedFeed {
        title,
        description,
        site_url,
        items,
    })
}

/// Strip HTML tags from text.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_entity = false;
    let mut entity = String::new();

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '&' if !in_tag => {
                in_entity = true;
                entity.clear();
            }
            ';' if in_entity => {
                in_entity = false;
                // Decode common HTML entities
                match entity.as_str() {
                    "amp" => result.push('&'),
                    "lt" => result.push('<'),
                    "gt" => result.push('>'),
                    "quot" => result.push('"'),
                    "apos" => result.push('\''),
                    "nbsp" => result.push(' '),
                    _ if entity.starts_with('#') => {
                        if let Some(code) = parse_numeric_entity(&entity) {
                            if let Some(c) = char::from_u32(code) {
                                result.push(c);
                            }
                        }
                    }
                    _ => {
                        // Unknown entity, keep as-is
                        result.push('&');
                        result.push_str(&entity);
                        result.push(';');
                    }
                }
            }
            _ if in_entity => {
                entity.push(ch);
            }
            _ if !in_tag => {
                result.push(ch);
            }
            _ => {}
        }
    }

    // Clean up whitespace
    let result: String = result.split_whitespace().collect::<Vec<&str>>().join(" ");

    result.trim().to_string()
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if entity.starts_with("#x") || entity.starts_with("#X") {
        u32::from_str_radix(&entity[2..], 16).ok()
    } else if entity.starts_with('#') {
        entity[1..].parse().ok()
    } else {
        None
    }
}

/// Truncate description to maximum length.
fn truncate_description(text: &str) -> String {
    if text.len() <= MAX_DESCRIPTION_LENGTH {
        text.to_string()
    } else {
        text.chars().take(MAX_DESCRIPTION_LENGTH).collect()
    }
}
