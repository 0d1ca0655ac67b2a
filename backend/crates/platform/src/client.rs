//! Client identification utilities
//!
//! Who is calling, as far as the request headers can tell. Used only to
//! annotate refresh-token records for auditing; never for authorization.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Fallback when the request carries no usable User-Agent
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// Client metadata attached to every refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMetadata {
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    /// User-Agent header, or [`UNKNOWN_USER_AGENT`]
    pub user_agent: String,
}

impl ClientMetadata {
    pub fn new(ip: Option<IpAddr>, user_agent: impl Into<String>) -> Self {
        Self {
            ip,
            user_agent: user_agent.into(),
        }
    }

    /// Get IP as string (for database storage)
    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Extract client metadata from request headers
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Peer address of the TCP connection, if known
pub fn extract_client_metadata(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> ClientMetadata {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .unwrap_or(UNKNOWN_USER_AGENT);

    ClientMetadata::new(extract_client_ip(headers, direct_ip), user_agent)
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP. IPv4-mapped IPv6 addresses
/// (`::ffff:1.2.3.4`) are reported as plain IPv4.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or(direct_ip).map(|ip| ip.to_canonical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_garbage_xff_falls_back_to_direct() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let direct: IpAddr = "10.1.2.3".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct)), Some(direct));
    }

    #[test]
    fn test_ipv4_mapped_is_canonicalised() {
        let headers = HeaderMap::new();
        let mapped: IpAddr = "::ffff:203.0.113.7".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(mapped));
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_user_agent_defaults_to_unknown() {
        let meta = extract_client_metadata(&HeaderMap::new(), None);
        assert_eq!(meta.user_agent, UNKNOWN_USER_AGENT);
        assert_eq!(meta.ip, None);
    }

    #[test]
    fn test_user_agent_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 Test Browser"),
        );

        let meta = extract_client_metadata(&headers, None);
        assert_eq!(meta.user_agent, "Mozilla/5.0 Test Browser");
    }
}
