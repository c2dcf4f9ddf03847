//! HTTP protocol layer module
//!
//! Protocol helpers shared by the asset store and the responder:
//! validators, content types, and response builders.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_500_response, build_asset_response,
    build_not_found_response, build_redirect_response,
};
