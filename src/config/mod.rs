// Configuration module entry point
// Loads host configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{AssetsConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Prefix for environment overrides, e.g. `STATIC_EDGE__SERVER__PORT=9000`
const ENV_PREFIX: &str = "STATIC_EDGE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; environment overrides and defaults fill the rest
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("assets.directory", "public")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "static-edge")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Authority used for requests that arrive without a `Host` header
    pub fn default_authority(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/static-edge").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.assets.directory, "public");
        assert_eq!(cfg.assets.index_files, ["index.html", "index.htm"]);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.shutdown_timeout, 10);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.http.server_name, "static-edge");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9000
workers = 2

[assets]
directory = "dist"
index_files = ["index.html"]

[logging]
level = "debug"
access_log = false
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 9000);
        assert_eq!(cfg.default_authority(), "0.0.0.0:9000");
        assert_eq!(cfg.server.workers.map(std::num::NonZeroUsize::get), Some(2));
        assert_eq!(cfg.assets.directory, "dist");
        assert_eq!(cfg.assets.index_files, ["index.html"]);
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(&path, "[server]\nworkers = 0\n").unwrap();

        assert!(Config::load_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let mut cfg = Config::load_from("does-not-exist/static-edge").unwrap();
        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
