// Application state module
// Shared, read-only state handed to every connection

use crate::assets::DirectoryStore;
use crate::responder::AssetResponder;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub responder: AssetResponder<DirectoryStore>,
    /// Authority assumed for requests without a `Host` header
    pub default_authority: String,
}

impl AppState {
    pub fn new(config: &Config, store: DirectoryStore) -> Self {
        Self {
            config: config.clone(),
            responder: AssetResponder::new(store),
            default_authority: config.default_authority(),
        }
    }
}
