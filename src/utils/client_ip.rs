//! Client IP resolution.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Returned when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the client IP used for rate limiting and bot scoring.
///
/// When `trust_proxy` is set, `X-Real-IP` wins, then the first entry of
/// `X-Forwarded-For`. Otherwise, and as a last resort, the socket peer address
/// is used.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = header_str(headers, X_REAL_IP) {
            return ip.to_string();
        }

        if let Some(first) = header_str(headers, X_FORWARDED_FOR)
            .and_then(|fwd| fwd.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return first.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
