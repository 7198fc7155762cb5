//! gRPC adapter.
//!
//! `mailing_list.MailingListService` mirrors the five JSON routes on
//! prost messages. Not-found is an empty `EmailResponse`; failures are
//! returned as a `Status` (`InvalidArgument`, `AlreadyExists`, `NotFound`
//! or `Internal`).

pub mod client;
pub mod proto;
pub mod server;
pub mod service;

pub use client::MailingListClient;
pub use proto::*;
pub use server::{GrpcServer, MailingListServiceServer, SERVICE_NAME};
pub use service::{MailServer, MailingListService};
