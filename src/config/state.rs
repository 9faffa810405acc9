// Application state module
// Immutable per-server state shared by every request

use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    /// Canonical root directory
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub server_name: String,
    pub access_log: bool,
    pub access_log_format: String,
}

impl AppState {
    /// `root` must already be canonical; request paths are checked against it.
    pub fn new(config: &Config, root: PathBuf) -> Self {
        Self {
            root,
            index_files: config.http.index_files.clone(),
            server_name: config.http.server_name.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
        }
    }
}
