//! Custom extractors.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Client address used for rate limiting and bot scoring.
///
/// Proxy headers are honoured only when the service is configured as running
/// behind a proxy. Falls back to `unknown` when the server was started without
/// connect info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self(resolve_client_ip(&parts.headers, peer, state.behind_proxy)))
    }
}
