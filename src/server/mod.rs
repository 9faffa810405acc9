// Server module entry point
// Listener creation, accept loop, connection serving, and lifecycle

pub mod connection;
pub mod lifecycle;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use lifecycle::{start, Server, ServerHandle};
pub use listener::create_listener;
pub use server_loop::start_server_loop;
