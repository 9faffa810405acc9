//! Request handler module
//!
//! Responsible for request dispatch and static file processing: path
//! translation, file and index serving, and directory listings.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
