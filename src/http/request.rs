//! Request-side helpers.
//!
//! # Responsibilities
//! - Resolve the client network address used as the session key
//! - Assign and propagate an `x-request-id` for tracing

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Peer IP address of the request, without the port.
///
/// IPv4-mapped IPv6 peers are reported in their IPv4 form so the same client
/// always maps to the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl ClientAddress {
    pub fn from_socket(addr: &SocketAddr) -> Self {
        ClientAddress(addr.ip().to_canonical().to_string())
    }
}

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| ClientAddress::from_socket(addr))
            .ok_or_else(|| {
                tracing::error!("Connection info missing; server not started with connect info");
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }
}

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_address_strips_port() {
        let addr: SocketAddr = "192.168.1.20:51234".parse().unwrap();
        assert_eq!(ClientAddress::from_socket(&addr).0, "192.168.1.20");
    }

    #[test]
    fn test_client_address_unmaps_ipv4() {
        let addr: SocketAddr = "[::ffff:10.0.0.5]:8080".parse().unwrap();
        assert_eq!(ClientAddress::from_socket(&addr).0, "10.0.0.5");

        let addr: SocketAddr = "[::1]:8080".parse().unwrap();
        assert_eq!(ClientAddress::from_socket(&addr).0, "::1");
    }
}
