// Configuration module entry point
// Compiled-in defaults, address resolution, and shared request state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::error::ServerError;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ROOT: &str = "test_data";

impl Config {
    /// Build the configuration from compiled-in defaults.
    ///
    /// No file or environment source is consulted: a local test server must
    /// start the same way every time. Use the `with_*` methods to adjust it.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", DEFAULT_ROOT)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default(
                "http.server_name",
                concat!("dirserve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .build()?;

        settings.try_deserialize()
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.server.root = root.into();
        self
    }

    #[must_use]
    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server.host = host.into();
        self.server.port = port;
        self
    }

    #[must_use]
    pub const fn with_access_log(mut self, enabled: bool) -> Self {
        self.logging.access_log = enabled;
        self
    }

    /// Resolve `server.host:server.port`, preferring an IPv4 address so that
    /// `localhost` binds to `127.0.0.1`.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let host = self.server.host.as_str();
        let port = self.server.port;

        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| ServerError::AddressResolution {
                host: host.to_string(),
                port,
                source,
            })?
            .collect();

        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| ServerError::NoAddress {
                host: host.to_string(),
                port,
            })
    }

    /// URL printed at startup, using the configured host name
    pub fn display_url(&self, bound: &SocketAddr) -> String {
        format!("http://{}:{}/", self.server.host, bound.port())
    }
}
