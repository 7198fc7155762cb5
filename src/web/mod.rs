//! JSON/HTTP adapter.
//!
//! Five routes under `/email` translate JSON bodies into registry calls
//! and render the unified result: an entry (or `null` when absent), an
//! array of entries, or an `{"Err": ...}` body with a 400/404/500 status.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::JsonServer;
