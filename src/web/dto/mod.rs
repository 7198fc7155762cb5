//! Data Transfer Objects for the JSON API.

pub mod request;
pub mod response;
pub mod timestamp;
pub mod validation;

pub use request::*;
pub use response::*;
pub use timestamp::ConfirmedAt;
pub use validation::ValidatedJson;
