//! Response DTOs for the JSON API.

use serde::Serialize;

use super::timestamp::ConfirmedAt;
use crate::db::EmailEntry;

/// An entry as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailEntryResponse {
    /// Row ID.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Subscriber address.
    #[serde(rename = "Email")]
    pub email: String,
    /// Confirmation time, `null` when unconfirmed.
    #[serde(rename = "ConfirmedAt")]
    pub confirmed_at: Option<ConfirmedAt>,
    /// Opt-out flag.
    #[serde(rename = "OptOut")]
    pub opt_out: bool,
}

impl From<EmailEntry> for EmailEntryResponse {
    fn from(entry: EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            confirmed_at: ConfirmedAt::from_epoch(entry.confirmed_at),
            opt_out: entry.opt_out,
        }
    }
}
