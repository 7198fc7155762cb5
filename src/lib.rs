//! Mailing list subscriber registry.
//!
//! One SQLite table of subscribers, served over a JSON/HTTP API and a
//! gRPC API that share the same registry.

pub mod config;
pub mod db;
pub mod error;
pub mod grpc;
pub mod logging;
pub mod registry;
pub mod web;

pub use config::Config;
pub use db::{BatchQuery, Database, EmailEntry, EmailRepository, EmailUpdate};
pub use error::{ErrorKind, MailError, Result};
pub use grpc::{GrpcServer, MailingListClient};
pub use registry::MailingList;
pub use web::JsonServer;
