//! Asset responder
//!
//! Answers a request from the asset store, falling back to the site's root
//! document so client-side routes survive a reload, and finally to a plain
//! `404 Not Found`.

use hyper::{StatusCode, Uri};
use std::io;

use crate::assets::{AssetRequest, AssetResponse, AssetStore};
use crate::http;
use crate::logger;

/// Root document served for paths with no matching asset
pub const INDEX_DOCUMENT: &str = "/index.html";

/// Which lookup produced the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    /// The asset matching the request path
    Direct,
    /// The root document
    Fallback,
    /// Neither lookup resolved
    NotFound,
}

impl AssetSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Fallback => "fallback",
            Self::NotFound => "not_found",
        }
    }
}

/// Response returned by [`AssetResponder::handle`]
#[derive(Debug)]
pub struct Served {
    pub response: AssetResponse,
    pub source: AssetSource,
}

/// Single-function request handler over an [`AssetStore`]
#[derive(Debug, Clone)]
pub struct AssetResponder<S> {
    store: S,
}

impl<S: AssetStore> AssetResponder<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Serve `request`: the asset itself, else the root document, else 404.
    ///
    /// Store errors are returned as-is; nothing is retried.
    pub async fn handle(&self, request: &AssetRequest) -> io::Result<Served> {
        let response = self.store.fetch(request).await?;
        if is_servable(response.status()) {
            return Ok(Served {
                response,
                source: AssetSource::Direct,
            });
        }

        let index = index_url(request.url());
        logger::log_debug(&format!(
            "No asset for {} ({}), trying {index}",
            request.url(),
            response.status()
        ));

        let response = self.store.fetch(&AssetRequest::get(index)).await?;
        if is_servable(response.status()) {
            return Ok(Served {
                response,
                source: AssetSource::Fallback,
            });
        }

        Ok(Served {
            response: http::build_not_found_response(),
            source: AssetSource::NotFound,
        })
    }
}

/// Statuses in `[200, 400)` are passed through to the client
pub fn is_servable(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// URL of the root document on the same origin as `url`
///
/// Path and query of `url` are discarded.
pub fn index_url(url: &Uri) -> Uri {
    let mut builder = Uri::builder();
    if let (Some(scheme), Some(authority)) = (url.scheme(), url.authority()) {
        builder = builder.scheme(scheme.clone()).authority(authority.clone());
    }
    builder
        .path_and_query(INDEX_DOCUMENT)
        .build()
        .unwrap_or_else(|_| Uri::from_static(INDEX_DOCUMENT))
}
