//! Client identity extraction for rate limiting.
//!
//! The key is best-effort: the proxy headers consulted here are trivially
//! spoofable when the service is reachable without a trusted proxy in front.
//! It buckets requests for rate limiting and must not be used as an
//! authentication signal.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Key used when neither headers nor the peer address identify the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the client key from request headers and the peer address.
///
/// Precedence:
/// 1. `CF-Connecting-IP`
/// 2. First entry of `X-Forwarded-For`
/// 3. `X-Real-IP`
/// 4. Peer socket IP with the port stripped
/// 5. [`UNKNOWN_CLIENT`]
///
/// Empty or non-UTF-8 header values are skipped.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_key_from_parts(&headers, None), "203.0.113.7");
/// ```
pub fn client_key_from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(ip) = header_str(headers, CF_CONNECTING_IP) {
        return ip.to_string();
    }

    if let Some(first) = header_str(headers, X_FORWARDED_FOR)
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    if let Some(ip) = header_str(headers, X_REAL_IP) {
        return ip.to_string();
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

/// Extractor yielding the request's client key.
///
/// Reads the peer address from [`ConnectInfo`] when the server was started with
/// `into_make_service_with_connect_info`; never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientKey(client_key_from_parts(&parts.headers, peer)))
    }
}
