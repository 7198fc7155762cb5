//! Request DTOs for the JSON API.
//!
//! Field names follow the wire format: `Email`, `ConfirmedAt`, `OptOut`,
//! `Page`, `Count`.

use serde::Deserialize;
use validator::Validate;

use super::timestamp::ConfirmedAt;
use super::validation::email_key;
use crate::db::EmailUpdate;

/// Body of the create, get and delete routes. Only `Email` is read.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    /// Subscriber address.
    #[serde(rename = "Email")]
    #[validate(custom(function = "email_key"))]
    pub email: String,
}

/// Body of the update route: a full entry. `Id` is accepted and ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmailRequest {
    /// Ignored; entries are addressed by email.
    #[serde(rename = "Id", default)]
    pub id: Option<i64>,
    /// Subscriber address.
    #[serde(rename = "Email")]
    #[validate(custom(function = "email_key"))]
    pub email: String,
    /// Confirmation time as RFC 3339 or epoch seconds; absent or `null` means unconfirmed.
    #[serde(rename = "ConfirmedAt", default)]
    pub confirmed_at: Option<ConfirmedAt>,
    /// Opt-out flag; absent means subscribed.
    #[serde(rename = "OptOut", default)]
    pub opt_out: bool,
}

impl UpdateEmailRequest {
    /// Convert into the storage upsert payload.
    pub fn into_update(self) -> EmailUpdate {
        EmailUpdate {
            email: self.email,
            confirmed_at: self.confirmed_at.map_or(0, ConfirmedAt::epoch),
            opt_out: self.opt_out,
        }
    }
}

/// Body of the getbatch route.
///
/// A missing field deserializes to 0 so that it fails the same range rule
/// as an explicit 0.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequest {
    /// 1-indexed page number.
    #[serde(rename = "Page", default)]
    #[validate(range(min = 1, message = "page and count fields are required and must be > 0"))]
    pub page: i64,
    /// Page size.
    #[serde(rename = "Count", default)]
    #[validate(range(min = 1, message = "page and count fields are required and must be > 0"))]
    pub count: i64,
}
