// Server lifecycle module
// Starting (root check + bind) -> Serving -> stopped

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::listener::create_listener;
use super::server_loop::start_server_loop;
use super::signal;
use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;

/// A bound server that has not started serving yet
pub struct Server {
    listener: std::net::TcpListener,
    local_addr: SocketAddr,
    url: String,
    state: Arc<AppState>,
}

impl Server {
    /// Validate the root directory and bind the listener.
    ///
    /// The root is checked before binding, so a missing root never occupies
    /// the port.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let root = resolve_root(&config.server.root)?;
        let addr = config.get_socket_addr()?;

        let listener = create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::Runtime)?;

        Ok(Self {
            listener,
            local_addr,
            url: config.display_url(&local_addr),
            state: Arc::new(AppState::new(config, root)),
        })
    }

    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL the server is reachable at, e.g. `http://localhost:8000/`
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Canonical root directory being served
    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Serve until `shutdown` resolves, then close the listener.
    ///
    /// Needs a Tokio runtime; connection tasks run on an internal `LocalSet`
    /// and are dropped when this returns.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let listener = TcpListener::from_std(self.listener).map_err(ServerError::Runtime)?;
                start_server_loop(listener, self.state, shutdown).await;
                logger::log_server_stopped(&self.local_addr);
                Ok::<(), ServerError>(())
            })
            .await
    }

    /// Block the calling thread serving requests until SIGINT/SIGTERM.
    pub fn serve_forever(self) -> Result<(), ServerError> {
        let runtime = build_runtime()?;
        runtime.block_on(self.run_until(async {
            match signal::wait_for_termination().await {
                Ok(()) => logger::log_interrupt(),
                Err(e) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    std::future::pending::<()>().await;
                }
            }
        }))
    }

    /// Serve on a dedicated thread; the returned handle stops it.
    pub fn spawn(self) -> Result<ServerHandle, ServerError> {
        let local_addr = self.local_addr;
        let shutdown = Arc::new(Notify::new());
        let notify = Arc::clone(&shutdown);

        let thread = std::thread::Builder::new()
            .name(format!("dirserve-{}", local_addr.port()))
            .spawn(move || {
                let runtime = build_runtime()?;
                runtime.block_on(self.run_until(async move { notify.notified().await }))
            })
            .map_err(ServerError::Runtime)?;

        Ok(ServerHandle {
            local_addr,
            shutdown,
            thread: Some(thread),
        })
    }
}

/// Handle to a server running on its own thread
///
/// Dropping the handle stops the server as well.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<Notify>,
    thread: Option<JoinHandle<Result<(), ServerError>>>,
}

impl ServerHandle {
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, release the port, and wait for the server thread.
    pub fn stop(mut self) -> Result<(), ServerError> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> Result<(), ServerError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // Stores a permit if the loop is not waiting yet
        self.shutdown.notify_one();
        thread.join().map_err(|_| ServerError::ThreadPanicked)?
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown_and_join() {
            logger::log_error(&format!("Server on {} failed: {e}", self.local_addr));
        }
    }
}

/// Bind a server from `config` and serve it on the current thread.
///
/// Prints the startup line once the port is bound. Blocks until the process
/// is interrupted.
pub fn start(config: &Config) -> Result<(), ServerError> {
    let server = Server::bind(config)?;
    logger::log_server_start(config, &server.local_addr());
    server.serve_forever()
}

/// Canonicalize the root and check that it is a readable directory
fn resolve_root(root: &Path) -> Result<PathBuf, ServerError> {
    let canonical = root.canonicalize().map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ServerError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => ServerError::RootInaccessible {
            path: root.to_path_buf(),
            source,
        },
    })?;

    if !canonical.is_dir() {
        return Err(ServerError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }

    std::fs::read_dir(&canonical).map_err(|source| ServerError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(canonical)
}

/// Single-threaded runtime: the accept loop and every connection task share
/// one thread.
fn build_runtime() -> Result<tokio::runtime::Runtime, ServerError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServerError::Runtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &Path) -> Config {
        Config::load()
            .unwrap()
            .with_root(root)
            .with_address("127.0.0.1", 0)
            .with_access_log(false)
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = Server::bind(&test_config(&dir.path().join("missing"))).err().unwrap();
        assert!(matches!(err, ServerError::RootNotFound { .. }));
    }

    #[test]
    fn test_root_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();

        let err = Server::bind(&test_config(&file)).err().unwrap();
        assert!(matches!(err, ServerError::RootNotDirectory { .. }));
    }

    #[test]
    fn test_bind_reports_address() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::bind(&test_config(dir.path())).unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(
            server.url(),
            format!("http://127.0.0.1:{}/", server.local_addr().port())
        );
        assert_eq!(server.root(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_port_in_use() {
        let dir = tempfile::tempdir().unwrap();
        let existing = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = existing.local_addr().unwrap().port();

        let config = test_config(dir.path()).with_address("127.0.0.1", port);
        let err = Server::bind(&config).err().unwrap();
        assert!(err.is_addr_in_use(), "unexpected error: {err}");
    }

    #[test]
    fn test_spawn_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Server::bind(&test_config(dir.path())).unwrap().spawn().unwrap();
        let addr = handle.local_addr();

        assert!(std::net::TcpStream::connect(addr).is_ok());
        handle.stop().unwrap();
        assert!(std::net::TcpStream::connect(addr).is_err());
    }
}
