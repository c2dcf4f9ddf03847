//! static-edge: a static-site host that answers every request from an asset
//! directory, falls back to `/index.html` for client-side routes, and
//! otherwise returns `404 Not Found`.

pub mod assets;
pub mod config;
pub mod http;
pub mod logger;
pub mod responder;
pub mod server;

pub use assets::{AssetRequest, AssetResponse, AssetStore, DirectoryStore};
pub use responder::{AssetResponder, AssetSource, Served};
