// Listener module
// Creates the TCP listener the server accepts on

use socket2::{Domain, Protocol, Socket, Type};

/// Create a non-blocking `std::net::TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` is set on Unix so a restart is not blocked by sockets in
/// `TIME_WAIT`. `SO_REUSEPORT` is deliberately left off: a port held by
/// another listener must fail to bind.
///
/// The listener is created outside any runtime so that bind failures surface
/// before the server thread starts; convert it with
/// `tokio::net::TcpListener::from_std` once inside the runtime.
///
/// # Arguments
///
/// * `addr` - The socket address to bind to
///
/// # Returns
///
/// * `Ok(TcpListener)` - Successfully created and bound listener
/// * `Err(std::io::Error)` - Failed to create or bind socket
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<std::net::TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    Ok(socket.into())
}
