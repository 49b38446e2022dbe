// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
#[cfg(test)]
pub use state::testing;
pub use types::Config;

/// Prefix for environment overrides, e.g. `WIKI_SERVER__PORT=9090`
const ENV_PREFIX: &str = "WIKI";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(
        config_path: &str,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "flatwiki")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("storage.dir", ".")?
            .set_default("templates.dir", "templates")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Defaults only, ignoring config files and the environment
#[cfg(test)]
pub fn test_config() -> Config {
    let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(Default::default()));
    Config::load_with_env("/nonexistent/flatwiki-config", env).expect("defaults deserialize")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_with_env("/nonexistent/flatwiki-config", no_env()).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.storage.dir, ".");
        assert_eq!(cfg.templates.dir, "templates");
        assert_eq!(cfg.routes.front_page, "FrontPage");
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wiki.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000
workers = 2

[storage]
dir = "/var/lib/wiki"

[routes]
front_page = "Home"

[routes.health]
enabled = false
"#,
        )
        .unwrap();

        let cfg = Config::load_with_env(path.to_str().unwrap(), no_env()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.storage.dir, "/var/lib/wiki");
        assert_eq!(cfg.routes.front_page, "Home");
        assert!(!cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.readiness_path, "/readyz");
        // untouched sections keep their defaults
        assert_eq!(cfg.templates.dir, "templates");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let env = config::Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::from([
            ("WIKI_SERVER__PORT".to_string(), "9090".to_string()),
            ("WIKI_LOGGING__LEVEL".to_string(), "debug".to_string()),
        ])));
        let cfg = Config::load_with_env("/nonexistent/flatwiki-config", env).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::load_with_env("/nonexistent/flatwiki-config", no_env()).unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
