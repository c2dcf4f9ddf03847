//! Asset store capability
//!
//! The responder talks to static assets only through [`AssetStore`]. A store
//! answers every lookup with an ordinary HTTP response; an `Err` means the
//! store itself failed, not that the asset is missing.

pub mod directory;

pub use directory::DirectoryStore;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HOST;
use hyper::http::request::Parts;
use hyper::http::uri::{Authority, PathAndQuery, Scheme};
use hyper::{HeaderMap, Method, Response, Uri};
use std::future::Future;
use std::io;

/// Response produced by an asset lookup
pub type AssetResponse = Response<Full<Bytes>>;

/// External asset-lookup capability (the static-asset binding)
pub trait AssetStore: Send + Sync {
    /// Resolve a request to a response. Status codes carry hit/miss.
    fn fetch(&self, request: &AssetRequest) -> impl Future<Output = io::Result<AssetResponse>> + Send;
}

/// A lookup against the asset store: method, absolute URL and headers
#[derive(Debug, Clone)]
pub struct AssetRequest {
    method: Method,
    url: Uri,
    headers: HeaderMap,
}

impl AssetRequest {
    pub const fn new(method: Method, url: Uri, headers: HeaderMap) -> Self {
        Self { method, url, headers }
    }

    /// Bare GET for a URL, as issued when fetching a URL rather than a request
    pub fn get(url: Uri) -> Self {
        Self::new(Method::GET, url, HeaderMap::new())
    }

    /// Build from an inbound request head, deriving its absolute URL
    ///
    /// `default_authority` stands in when the request carries no usable `Host`.
    pub fn from_parts(parts: &Parts, default_authority: &str) -> Self {
        let host = parts.headers.get(HOST).and_then(|v| v.to_str().ok());
        Self::new(
            parts.method.clone(),
            absolute_url(&parts.uri, host, default_authority),
            parts.headers.clone(),
        )
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub const fn url(&self) -> &Uri {
        &self.url
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Header value as text, if present and valid ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Rebuild the full URL of an origin-form request target
fn absolute_url(target: &Uri, host: Option<&str>, default_authority: &str) -> Uri {
    if target.scheme().is_some() && target.authority().is_some_and(is_plain_authority) {
        return target.clone();
    }

    let authority = host
        .and_then(|h| h.parse::<Authority>().ok())
        .filter(is_plain_authority)
        .or_else(|| default_authority.parse::<Authority>().ok());
    let Some(authority) = authority else {
        return target.clone();
    };

    let path_and_query = target
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .unwrap_or_else(|_| target.clone())
}

/// Host and optional port only; userinfo is not part of an origin
fn is_plain_authority(authority: &Authority) -> bool {
    !authority.as_str().contains('@')
}
