//! Validator module
//!
//! `ETag` generation and `If-None-Match` evaluation for asset responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a strong `ETag` from asset content
///
/// # Returns
/// Quoted hex digest, e.g. `"9f2c4e1a07b3d5c8"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check whether a client's `If-None-Match` header covers the asset's `ETag`
///
/// Accepts a single tag, a comma separated list, weak tags (`W/"..."`) and `*`.
/// Returns true when the store should answer 304.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.trim_start_matches("W/") == etag
        })
    })
}
