//! Logger module
//!
//! Provides logging utilities for the file server:
//! - Startup line and lifecycle messages
//! - Access logging in `common` or `combined` format
//! - Error and warning logging
//!
//! The startup line is the only output on stdout; everything else goes to
//! stderr.

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

fn write_log(message: &str) {
    eprintln!("{message}");
}

/// The line announcing where the server can be reached
pub fn startup_line(config: &Config, addr: &SocketAddr) -> String {
    format!("Test server running at {}", config.display_url(addr))
}

/// Print the startup line on stdout
pub fn log_server_start(config: &Config, addr: &SocketAddr) {
    println!("{}", startup_line(config, addr));
    write_log(&format!(
        "[INFO] Serving '{}' on {addr}",
        config.server.root.display()
    ));
}

pub fn log_server_stopped(addr: &SocketAddr) {
    write_log(&format!("[INFO] Server on {addr} stopped"));
}

pub fn log_interrupt() {
    write_log("\n[INFO] Keyboard interrupt received, exiting.");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_log(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_log(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_log(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_log(&entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_line_defaults() {
        let config = Config::load().unwrap();
        let addr: SocketAddr = "127.0.0.1:8000".parse().unwrap();
        assert_eq!(
            startup_line(&config, &addr),
            "Test server running at http://localhost:8000/"
        );
    }

    #[test]
    fn test_startup_line_uses_bound_port() {
        let config = Config::load().unwrap().with_address("127.0.0.1", 0);
        let addr: SocketAddr = "127.0.0.1:41234".parse().unwrap();
        assert_eq!(
            startup_line(&config, &addr),
            "Test server running at http://127.0.0.1:41234/"
        );
    }
}
