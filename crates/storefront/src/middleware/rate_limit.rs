//! Rate limiting using governor and `tower_governor`.
//!
//! Only the contact form is limited: it is the one endpoint that forwards
//! visitor text to a backend.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{extract::ConnectInfo, http::Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Client IP key extractor.
///
/// Uses the socket peer address. Only when `trust_proxy_headers` is set
/// (the app runs behind a proxy that overwrites them) are `X-Forwarded-For`
/// and `X-Real-IP` consulted first; otherwise any client could pick its own
/// bucket. Requests with no usable address share a single bucket instead of
/// being rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }

    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        Self::header_ip(req, "x-forwarded-for").or_else(|| Self::header_ip(req, "x-real-ip"))
    }

    fn peer_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    }

    fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let ip = if self.trust_proxy_headers {
            Self::forwarded_ip(req).or_else(|| Self::peer_ip(req))
        } else {
            Self::peer_ip(req)
        };
        Ok(ip.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for contact submissions: about 6 per minute per IP.
///
/// One token every 10 seconds, burst of 3. See [`ClientIpKeyExtractor`]
/// for `trust_proxy_headers`.
///
/// # Panics
///
/// Does not panic: `per_second(10)` and `burst_size(3)` are both non-zero,
/// which is all `GovernorConfigBuilder::finish` checks.
#[must_use]
pub fn contact_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy_headers))
        .per_second(10)
        .burst_size(3)
        .finish()
        .expect("rate limiter config with per_second(10) and burst_size(3) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/contact");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    fn peer(req: &mut Request<()>, addr: &str) -> IpAddr {
        let addr: SocketAddr = addr.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        addr.ip()
    }

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor::new(true);
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor::new(false);

    #[test]
    fn test_spoofed_forwarded_for_is_ignored_by_default() {
        let mut req = request(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        let addr = peer(&mut req, "192.0.2.10:5555");
        assert_eq!(DIRECT.extract(&req).unwrap(), addr);
    }

    #[test]
    fn test_forwarded_for_uses_first_hop_behind_proxy() {
        let mut req = request(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        peer(&mut req, "10.0.0.1:443");
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_real_ip_header_behind_proxy() {
        let req = request(&[("x-real-ip", "198.51.100.2")]);
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_proxy_without_headers_falls_back_to_peer() {
        let mut req = request(&[]);
        let addr = peer(&mut req, "192.0.2.10:5555");
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), addr);
    }

    #[test]
    fn test_unknown_client_shares_bucket() {
        let req = request(&[("x-forwarded-for", "not-an-ip")]);
        assert_eq!(
            BEHIND_PROXY.extract(&req).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        assert_eq!(
            DIRECT.extract(&req).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
