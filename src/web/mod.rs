//! Web API module for Materials Hub.
//!
//! REST API for account management and material upload, listing,
//! download, and deletion.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
