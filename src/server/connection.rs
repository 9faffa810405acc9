// Connection handling module
// Serves HTTP/1 on a single accepted TCP connection

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection in a task on the current `LocalSet`.
///
/// The task owns the stream; a failing connection is logged and dropped
/// without affecting the accept loop or other connections.
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - The client's socket address, used for access logging
/// * `state` - Shared application state
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            // Clients hanging up mid-request are not worth reporting
            if !err.is_incomplete_message() {
                logger::log_connection_error(&err);
            }
        }
    });
}
