//! Web API module for CloudVault.
//!
//! REST API over the vault core: JWT-authenticated file and folder
//! operations plus signature-authenticated share links.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
