//! dirserve: a local static file server for manual testing
//!
//! Serves a directory (by default `test_data`) on `localhost:8000`: files
//! are sent byte-for-byte with a content type inferred from the extension,
//! directories are answered with their index file or a generated listing.
//!
//! ```no_run
//! use dirserve::{Config, Server};
//!
//! let config = Config::load()?.with_root("public").with_address("127.0.0.1", 0);
//! let handle = Server::bind(&config)?.spawn()?;
//! println!("serving on {}", handle.local_addr());
//! handle.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::Config;
pub use crate::error::{RequestError, ServerError};
pub use crate::server::{start, Server, ServerHandle};
