use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Identity of requests that carry neither forwarding headers nor a socket address.
/// All of them share the `ip:undefined` cooldown, the key earlier deployments wrote.
pub const UNKNOWN_CLIENT: &str = "undefined";

/// The string used to tell visitors apart.
///
/// Taken from the first entry of `X-Forwarded-For`, then `X-Real-IP`,
/// then the IP of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn resolve(headers: &HeaderMap, socket: Option<SocketAddr>) -> Self {
        let forwarded = header(headers, &X_FORWARDED_FOR)
            .and_then(|value| value.split(',').next())
            .filter(|value| !value.is_empty());

        let identity = forwarded
            .or_else(|| header(headers, &X_REAL_IP).filter(|value| !value.is_empty()))
            .map(str::to_owned)
            .or_else(|| socket.map(|address| address.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned());

        Self(identity)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let socket = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| *address);

        Ok(Self::resolve(&parts.headers, socket))
    }
}

/// Scheme the client used to reach us, as reported by a proxy.
pub fn request_scheme(headers: &HeaderMap) -> &str {
    header(headers, &X_FORWARDED_PROTO)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("http")
}

fn header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
