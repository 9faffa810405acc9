//! Error types
//!
//! `ServerError` covers faults that stop the server from starting or running.
//! `RequestError` covers faults confined to a single request; each maps to an
//! HTTP status and never reaches the accept loop.

use hyper::StatusCode;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("root directory '{}' does not exist", path.display())]
    RootNotFound { path: PathBuf },

    #[error("root path '{}' is not a directory", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("cannot read root directory '{}': {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot resolve address {host}:{port}: {source}")]
    AddressResolution {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("address {host}:{port} resolved to nothing")]
    NoAddress { host: String, port: u16 },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),

    #[error("server thread panicked")]
    ThreadPanicked,
}

impl ServerError {
    /// True when the port is already taken by another socket
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, Self::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request path")]
    MalformedPath,

    #[error("not found")]
    NotFound,

    #[error("'{}' resolves outside the root directory", .0.display())]
    OutsideRoot(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPath => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::OutsideRoot(_) => StatusCode::NOT_FOUND,
            Self::Io(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
