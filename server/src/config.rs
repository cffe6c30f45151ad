//! Server settings, filled from the command line in `main`

use shared::DEFAULT_PORT;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the UDP socket binds to
    pub bind_addr: String,
    /// SQLite database file, created on first start
    pub database: PathBuf,
    /// Upper bound on one request's store work, including lock waits
    pub request_timeout: Duration,
    /// Echo raw store errors to clients instead of a generic message
    pub expose_store_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            database: PathBuf::from("game.db"),
            request_timeout: Duration::from_secs(5),
            expose_store_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8881");
        assert_eq!(config.database, PathBuf::from("game.db"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.expose_store_errors);
    }
}
